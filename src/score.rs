// best scores per (level, difficulty) and the game over report
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::difficulty::GameDifficulty;
use crate::error::StoreError;

const KEY_PREFIX: &str = "snakeHighScore";

pub fn high_score_key(level: u32, difficulty: GameDifficulty) -> String {
    format!("{}_level{}_{}", KEY_PREFIX, level, difficulty)
}

/// Key-value storage for best scores.
pub trait HighScoreStore {
    fn get(&self, key: &str) -> Option<u32>;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u32> {
        self.scores.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.scores.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Scores kept in a JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: HashMap<String, u32>,
}

impl JsonFileStore {
    /// Opens the file at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("ignoring corrupt high score file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        JsonFileStore { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_atomic(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(&self.scores)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<u32> {
        self.scores.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.scores.insert(key.to_owned(), value);
        self.save_atomic()
    }
}

/// Handed to the notifier once a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub final_score: u32,
    pub previous_best: u32,
    pub best: u32,
    pub is_new_record: bool,
}

impl GameOverReport {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GameOverReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_new_record {
            write!(
                f,
                "New High Score!\nYour Score: {}\nPrevious Best: {}",
                self.final_score, self.previous_best
            )
        } else {
            write!(
                f,
                "Game Over! Your Score: {}\nHighest Score: {}",
                self.final_score, self.best
            )
        }
    }
}

/// Best score of the running session's board, read once when the session starts.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    key: String,
    high_score: u32,
    reported: bool,
}

impl ScoreTracker {
    pub fn load<S: HighScoreStore + ?Sized>(
        store: &S,
        level: u32,
        difficulty: GameDifficulty,
    ) -> Self {
        let key = high_score_key(level, difficulty);
        let high_score = store.get(&key).unwrap_or(0);
        info!("best score for {} is {}", key, high_score);
        ScoreTracker {
            key,
            high_score,
            reported: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Settles the final score. Only the first call does anything: it persists
    /// an improved best and builds the report, later calls return `None`.
    pub fn on_game_over<S: HighScoreStore + ?Sized>(
        &mut self,
        store: &mut S,
        final_score: u32,
    ) -> Option<GameOverReport> {
        if self.reported {
            return None;
        }
        self.reported = true;

        let previous_best = self.high_score;
        let is_new_record = final_score > previous_best;
        if is_new_record {
            self.high_score = final_score;
            // a failed write still ends the session normally
            match store.set(&self.key, final_score) {
                Ok(()) => info!("new best {} saved for {}", final_score, self.key),
                Err(e) => error!("could not save best score for {}: {}", self.key, e),
            }
        }
        Some(GameOverReport {
            final_score,
            previous_best,
            best: self.high_score,
            is_new_record,
        })
    }
}
