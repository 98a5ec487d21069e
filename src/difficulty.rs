use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameDifficulty {
    Easy,
    Medium,
    Hard,
}

impl GameDifficulty {
    /// Milliseconds between two ticks.
    pub fn get_speed(&self) -> u64 {
        match self {
            GameDifficulty::Easy => 175,
            GameDifficulty::Medium => 150,
            GameDifficulty::Hard => 125,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.get_speed())
    }

    // direction changes closer together than this are dropped
    pub fn turn_interval(&self) -> Duration {
        self.tick_interval() / 2
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameDifficulty::Easy => "easy",
            GameDifficulty::Medium => "medium",
            GameDifficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for GameDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameDifficulty {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Err(SessionError::MissingDifficulty),
            "easy" => Ok(GameDifficulty::Easy),
            "medium" => Ok(GameDifficulty::Medium),
            "hard" => Ok(GameDifficulty::Hard),
            _ => Err(SessionError::UnknownDifficulty(value.to_owned())),
        }
    }
}
