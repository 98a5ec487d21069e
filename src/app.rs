// wires the settings, the menu and the terminal around one game loop per session
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Args, Paths, Settings};
use crate::game_loop::{GameLoop, LoopControl};
use crate::levels::{start_session, SessionPlan, LEVEL_COUNT};
use crate::notify::TerminalNotifier;
use crate::render::TerminalRenderer;
use crate::score::JsonFileStore;
use crate::terminal::{spawn_stdin_channel, ChannelReader, RawMode};

/// What the player wants once a session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    Replay,
    Menu,
    Leave,
}

/// Line prompts shown between sessions, while the terminal is in normal mode.
struct Menu<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    fn new(input: R, out: W) -> Self {
        Menu { input, out }
    }

    /// `None` once the input is closed, otherwise the trimmed answer.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{}", question)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks for whatever is still missing until the choices start a session.
    fn plan(
        &mut self,
        mut level: Option<u32>,
        mut difficulty: Option<String>,
    ) -> Result<Option<SessionPlan>> {
        loop {
            if difficulty.is_none() {
                match self.ask("Select difficulty (easy, medium, hard): ")? {
                    Some(answer) => difficulty = Some(answer),
                    None => return Ok(None),
                }
            }
            if level.is_none() {
                let question = format!("Select level (1-{}, enter for 1): ", LEVEL_COUNT);
                match self.ask(&question)? {
                    Some(answer) if answer.is_empty() => {}
                    Some(answer) => match answer.parse() {
                        Ok(number) => level = Some(number),
                        Err(_) => {
                            writeln!(self.out, "`{}` is not a level number", answer)?;
                            continue;
                        }
                    },
                    None => return Ok(None),
                }
            }
            match start_session(level, difficulty.as_deref().filter(|d| !d.is_empty())) {
                Ok(plan) => return Ok(Some(plan)),
                Err(e) => {
                    writeln!(self.out, "{}", e)?;
                    level = None;
                    difficulty = None;
                }
            }
        }
    }

    fn next_step(&mut self) -> Result<NextStep> {
        loop {
            let answer = self.ask("Play again? (enter: same board, m: menu, q: quit): ")?;
            let step = match answer.as_deref().map(str::to_ascii_lowercase).as_deref() {
                None | Some("q") => NextStep::Leave,
                Some("") | Some("y") => NextStep::Replay,
                Some("m") => NextStep::Menu,
                Some(_) => continue,
            };
            return Ok(step);
        }
    }
}

pub fn run(args: &Args, settings: &Settings, paths: &Paths) -> Result<()> {
    let scores_path = settings
        .scores_path
        .clone()
        .unwrap_or_else(|| paths.scores_path.clone());
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // one reader for the whole process, shared by the board and the menu
    let keys = spawn_stdin_channel();
    let mut menu = Menu::new(BufReader::new(ChannelReader::new(&keys)), io::stdout());

    let mut plan = match menu.plan(args.level, args.difficulty.clone())? {
        Some(plan) => plan,
        None => return Ok(()),
    };
    loop {
        // reloaded every session so a record set last time is the one to beat
        let store = JsonFileStore::open(scores_path.clone());
        let session_rng = StdRng::from_rng(&mut rng);
        let mut game = GameLoop::new(
            &plan,
            settings.grid_sizing(),
            settings.viewport(),
            store,
            TerminalNotifier::new(),
            session_rng,
        )?;

        let control = {
            let _raw = RawMode::enable().context("could not switch the terminal to raw mode")?;
            game.attach_renderer(Box::new(TerminalRenderer::stdout()));
            game.run(&keys)
        };

        match control {
            LoopControl::Finished(report) => {
                info!("session finished: {:?}", report);
                game.notifier_mut().flush_to(&mut io::stdout())?;
            }
            LoopControl::Quit | LoopControl::Continue => {
                println!("Left the board with score {}.", game.session().score());
            }
        }

        ChannelReader::new(&keys).discard_pending();
        match menu.next_step()? {
            NextStep::Replay => {}
            NextStep::Menu => match menu.plan(None, None)? {
                Some(next) => plan = next,
                None => break,
            },
            NextStep::Leave => break,
        }
    }
    info!("leaving snakeboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::GameDifficulty;

    fn menu(input: &str) -> Menu<io::Cursor<String>, Vec<u8>> {
        Menu::new(io::Cursor::new(input.to_string()), Vec::new())
    }

    #[test]
    fn ask_trims_answers() {
        let mut menu = menu("  hard \n");
        assert_eq!(menu.ask("difficulty? ").unwrap().as_deref(), Some("hard"));
        assert_eq!(menu.out, b"difficulty? ");
    }

    #[test]
    fn closed_input_is_no_answer() {
        let mut menu = menu("\n");
        assert_eq!(menu.ask("? ").unwrap().as_deref(), Some(""));
        assert_eq!(menu.ask("? ").unwrap(), None);
    }

    #[test]
    fn missing_choices_are_asked_for() {
        let mut menu = menu("Medium\n\n");
        let plan = menu.plan(None, None).unwrap().unwrap();
        assert_eq!(plan.difficulty, GameDifficulty::Medium);
        assert_eq!(plan.level.number, 1);
    }

    #[test]
    fn given_choices_skip_the_questions() {
        let mut menu = menu("");
        let plan = menu.plan(Some(5), Some("hard".to_string())).unwrap().unwrap();
        assert_eq!(plan.level.number, 5);
        assert!(menu.out.is_empty());
    }

    #[test]
    fn bad_choices_are_asked_again() {
        let mut menu = menu("fast\n2\neasy\nten\n9\neasy\n4\n");
        let plan = menu.plan(None, None).unwrap().unwrap();
        assert_eq!(plan.level.number, 4);
        assert_eq!(plan.difficulty, GameDifficulty::Easy);
        let out = String::from_utf8(menu.out).unwrap();
        assert!(out.contains("`ten` is not a level number"));
    }

    #[test]
    fn menu_gives_up_when_input_closes() {
        let mut menu = menu("easy\n");
        assert!(menu.plan(None, None).unwrap().is_none());
    }

    #[test]
    fn after_a_session_the_player_picks_what_comes_next() {
        let mut menu = menu("\nM\nwhat\nq\n");
        assert_eq!(menu.next_step().unwrap(), NextStep::Replay);
        assert_eq!(menu.next_step().unwrap(), NextStep::Menu);
        assert_eq!(menu.next_step().unwrap(), NextStep::Leave);
        // closed input leaves as well
        assert_eq!(menu.next_step().unwrap(), NextStep::Leave);
    }
}
