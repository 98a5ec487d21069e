use std::io::{self, Write};

use crate::score::GameOverReport;

/// Receives the single end-of-session report and decides how to show it.
pub trait Notifier {
    fn game_over(&mut self, report: &GameOverReport);
}

/// Prints the report once the terminal is back in normal mode.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    last: Option<GameOverReport>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    // the board owns the screen while playing, the report waits for the terminal to be restored
    pub fn flush_to(&mut self, out: &mut impl Write) -> io::Result<()> {
        if let Some(report) = self.last.take() {
            writeln!(out, "{}", report)?;
        }
        Ok(())
    }
}

impl Notifier for TerminalNotifier {
    fn game_over(&mut self, report: &GameOverReport) {
        self.last = Some(*report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_the_report_once() {
        let mut notifier = TerminalNotifier::new();
        notifier.game_over(&GameOverReport {
            final_score: 4,
            previous_best: 1,
            best: 4,
            is_new_record: true,
        });
        let mut out = Vec::new();
        notifier.flush_to(&mut out).unwrap();
        notifier.flush_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("New High Score!").count(), 1);
        assert!(text.contains("Your Score: 4"));
    }
}
