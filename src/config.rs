// Config Module - settings file and command-line arguments
use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::geometry::GridSizing;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Snake on a grid with levels, obstacles and saved high scores",
    long_about = "Steer the snake with the arrow keys or w/a/s/d, space pauses, q leaves the board.\n\
                  Levels 3, 5 and 6 have deadly walls, the others wrap around the edges.\n\
                  The best score of every level and difficulty is kept between runs."
)]
pub struct Args {
    /// Difficulty: easy, medium or hard (asked for when missing)
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Level to play, 1 to 6
    #[arg(short, long)]
    pub level: Option<u32>,

    /// Settings file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Viewport the grid is sized for, in pixels (e.g. 800x600)
    #[arg(long)]
    pub viewport: Option<Viewport>,

    /// Where to write the log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Seed for food placement, random when missing
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", s))?;
        let width: f64 = width
            .trim()
            .parse()
            .map_err(|_| format!("invalid width `{}`", width))?;
        let height: f64 = height
            .trim()
            .parse()
            .map_err(|_| format!("invalid height `{}`", height))?;
        if width <= 0.0 || height <= 0.0 {
            return Err("viewport dimensions must be positive".to_string());
        }
        Ok(Viewport { width, height })
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_tile_size: u32,
    pub base_canvas_size: u32,
    pub min_tile_size: u32,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub scores_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        let sizing = GridSizing::default();
        Settings {
            base_tile_size: sizing.base_tile_size,
            base_canvas_size: sizing.base_canvas_size,
            min_tile_size: sizing.min_tile_size,
            viewport_width: 1024.0,
            viewport_height: 768.0,
            log_level: "info".to_string(),
            log_file: None,
            scores_path: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Reads `explicit` when given, otherwise the default settings file if
    /// there is one. Without any file the defaults are used.
    pub fn load(explicit: Option<&Path>, paths: &Paths) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if paths.settings_path.exists() => paths.settings_path.as_path(),
            None => return Ok(Settings::default()),
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("could not read settings from {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut parsed: Settings = toml::from_str(contents)?;
        parsed.sanitize();
        Ok(parsed)
    }

    fn sanitize(&mut self) {
        self.base_tile_size = self.base_tile_size.max(1);
        self.base_canvas_size = self.base_canvas_size.max(1);
        self.min_tile_size = self.min_tile_size.max(1);
        if self.viewport_width.is_nan() || self.viewport_width <= 0.0 {
            self.viewport_width = Settings::default().viewport_width;
        }
        if self.viewport_height.is_nan() || self.viewport_height <= 0.0 {
            self.viewport_height = Settings::default().viewport_height;
        }
    }

    /// Command-line values win over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(viewport) = args.viewport {
            self.viewport_width = viewport.width;
            self.viewport_height = viewport.height;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
    }

    pub fn grid_sizing(&self) -> GridSizing {
        GridSizing {
            base_tile_size: self.base_tile_size,
            base_canvas_size: self.base_canvas_size,
            min_tile_size: self.min_tile_size,
        }
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

pub struct Paths {
    pub settings_path: PathBuf,
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "snakeboard", "Snakeboard")
        .context("could not resolve project directories")?;
    let data = proj.data_local_dir().to_path_buf();
    Ok(Paths {
        settings_path: proj.config_dir().join("settings.toml"),
        scores_path: data.join("high_scores.json"),
        log_path: data.join("snakeboard.log"),
    })
}
