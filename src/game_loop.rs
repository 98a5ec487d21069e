// drives one session: input between ticks, a step per tick, the report at the end
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::error::SessionError;
use crate::geometry::GridSizing;
use crate::input::{InputController, InputEvent, KeyDecoder};
use crate::levels::SessionPlan;
use crate::notify::Notifier;
use crate::render::{Frame, Renderer};
use crate::score::{GameOverReport, HighScoreStore, ScoreTracker};
use crate::snake::{Session, StepOutcome};
use crate::ticker::Ticker;

// sleep between two polls of the input channel
const IDLE_WAIT: Duration = Duration::from_millis(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    /// The session ended, the report has been handed to the notifier.
    Finished(GameOverReport),
    /// The player left the board before the game was over.
    Quit,
}

pub struct GameLoop<S: HighScoreStore, N: Notifier> {
    session: Session,
    controller: InputController,
    decoder: KeyDecoder,
    ticker: Ticker,
    tracker: ScoreTracker,
    sizing: GridSizing,
    store: S,
    notifier: N,
    renderer: Option<Box<dyn Renderer>>,
    rng: StdRng,
    dismissed: bool,
}

impl<S: HighScoreStore, N: Notifier> GameLoop<S, N> {
    pub fn new(
        plan: &SessionPlan,
        sizing: GridSizing,
        viewport: (f64, f64),
        store: S,
        notifier: N,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        let geometry = sizing.compute(viewport.0, viewport.1);
        let session = Session::new(&plan.level, geometry, &mut rng)?;
        Ok(Self::with_session(session, plan, sizing, store, notifier, rng))
    }

    /// Runs an already built board under the plan's timing and score key.
    pub fn with_session(
        session: Session,
        plan: &SessionPlan,
        sizing: GridSizing,
        store: S,
        notifier: N,
        rng: StdRng,
    ) -> Self {
        let tracker = ScoreTracker::load(&store, plan.level.number, plan.difficulty);
        let controller = InputController::new(session.direction(), plan.difficulty.turn_interval());
        GameLoop {
            session,
            controller,
            decoder: KeyDecoder::new(),
            ticker: Ticker::new(plan.difficulty.tick_interval()),
            tracker,
            sizing,
            store,
            notifier,
            renderer: None,
            rng,
            dismissed: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn high_score(&self) -> u32 {
        self.tracker.high_score()
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn attach_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
        self.draw();
    }

    /// Arms the timer. Nothing moves before this is called.
    pub fn start(&mut self, now: Instant) {
        self.sync_ticker(now);
        self.draw();
    }

    fn is_finished(&self) -> bool {
        self.dismissed || self.session.is_over()
    }

    fn sync_ticker(&mut self, now: Instant) {
        if self.session.is_running() && !self.dismissed {
            if !self.ticker.is_armed() {
                self.ticker.arm(now);
            }
        } else {
            self.ticker.disarm();
        }
    }

    /// Feeds raw terminal bytes and applies every complete event.
    pub fn feed(&mut self, bytes: &[u8], now: Instant) -> LoopControl {
        for &key in bytes {
            // decode as we go, the key buffer only ever holds a partial sequence
            self.decoder.push(key);
            while let Some(event) = self.decoder.next_event() {
                let control = self.handle(event, now);
                if control != LoopControl::Continue {
                    return control;
                }
            }
        }
        LoopControl::Continue
    }

    pub fn handle(&mut self, event: InputEvent, now: Instant) -> LoopControl {
        if self.is_finished() {
            return LoopControl::Continue;
        }
        match event {
            InputEvent::Quit => return self.dismiss(),
            InputEvent::TogglePause => {
                self.session.toggle_pause();
                self.sync_ticker(now);
                self.draw();
            }
            InputEvent::Steer(direction) => {
                if self.session.is_paused() {
                    self.session.toggle_pause();
                    self.sync_ticker(now);
                    self.draw();
                }
                self.controller.request(direction, now);
            }
        }
        LoopControl::Continue
    }

    /// Ends the session without a result, nothing is saved.
    pub fn dismiss(&mut self) -> LoopControl {
        if !self.dismissed {
            info!("session dismissed with score {}", self.session.score());
        }
        self.dismissed = true;
        self.ticker.disarm();
        LoopControl::Quit
    }

    /// Runs at most one step when the timer is due.
    pub fn tick(&mut self, now: Instant) -> LoopControl {
        if !self.ticker.poll(now) {
            return LoopControl::Continue;
        }
        // the controller's direction is read exactly once per tick
        self.session.steer(self.controller.direction());
        match self.session.step(&mut self.rng) {
            StepOutcome::Idle => LoopControl::Continue,
            StepOutcome::Moved | StepOutcome::Ate => {
                self.controller.commit(self.session.heading());
                self.draw();
                LoopControl::Continue
            }
            StepOutcome::GameOver(reason) => {
                debug!("tick ended the session: {:?}", reason);
                self.ticker.disarm();
                self.draw();
                self.report()
            }
        }
    }

    fn report(&mut self) -> LoopControl {
        match self
            .tracker
            .on_game_over(&mut self.store, self.session.score())
        {
            Some(report) => {
                self.notifier.game_over(&report);
                LoopControl::Finished(report)
            }
            None => LoopControl::Continue,
        }
    }

    /// Recomputes the grid for a new viewport. Called between ticks only.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        let geometry = self.sizing.compute(viewport_width, viewport_height);
        if geometry != *self.session.geometry() {
            debug!(
                "viewport {}x{} -> {} tiles of {}",
                viewport_width,
                viewport_height,
                geometry.tile_count_x(),
                geometry.tile_size()
            );
            self.session.resize(geometry, &mut self.rng);
            self.draw();
        }
    }

    fn draw(&mut self) {
        // stepping without a renderer attached is fine
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let geometry = self.session.geometry();
        let frame = Frame {
            snake: self.session.snake(),
            food: self.session.food(),
            obstacles: self.session.obstacles(),
            tile_size: geometry.tile_size(),
            canvas_size: geometry.canvas_size(),
            score: self.session.score(),
            high_score: self.tracker.high_score(),
            paused: self.session.is_paused(),
            wall_collision: self.session.wall_collision(),
        };
        if let Err(e) = renderer.draw(&frame) {
            warn!("skipping frame: {}", e);
        }
    }

    /// Blocking host loop: drains the input channel, ticks, and returns once
    /// the session is over or dismissed.
    pub fn run(&mut self, input: &Receiver<u8>) -> LoopControl {
        self.start(Instant::now());
        let mut keys = Vec::new();
        loop {
            // receive input from the reader thread
            loop {
                match input.try_recv() {
                    Ok(key) => keys.push(key),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("input closed, leaving the board");
                        return self.dismiss();
                    }
                }
            }
            let now = Instant::now();
            if !keys.is_empty() {
                let control = self.feed(&keys, now);
                keys.clear();
                if control != LoopControl::Continue {
                    return control;
                }
            }
            let control = self.tick(now);
            if control != LoopControl::Continue {
                return control;
            }
            if self.is_finished() {
                return LoopControl::Quit;
            }
            // wait for next frame
            thread::sleep(IDLE_WAIT);
        }
    }
}
