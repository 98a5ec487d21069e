use thiserror::Error;

use crate::geometry::Coordinates;

/// Reasons a session refuses to start. No partial session is created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a difficulty must be selected before starting")]
    MissingDifficulty,
    #[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
    UnknownDifficulty(String),
    #[error("levels are numbered from 1")]
    InvalidLevel,
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("starting cell ({}, {}) is blocked by an obstacle", .0.x, .0.y)]
    StartBlocked(Coordinates),
    #[error("the grid has no free cell left for food")]
    NoRoomForFood,
}

/// Failures of the high-score persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}
