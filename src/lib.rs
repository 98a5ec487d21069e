pub mod app;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod food;
pub mod game_loop;
pub mod geometry;
pub mod input;
pub mod levels;
pub mod notify;
pub mod render;
pub mod score;
pub mod snake;
pub mod terminal;
pub mod ticker;

pub use difficulty::GameDifficulty;
pub use error::{SessionError, StoreError};
pub use game_loop::{GameLoop, LoopControl};
pub use geometry::{Coordinates, Geometry, GridSizing, SnakeDirection};
pub use levels::{start_session, Level, SessionPlan};
pub use score::{GameOverReport, HighScoreStore, MemoryStore, ScoreTracker};
pub use snake::{GameState, OverReason, Session, StepOutcome};
