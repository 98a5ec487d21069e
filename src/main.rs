use std::fs::{self, File};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::{Config, WriteLogger};

use snakeboard::app;
use snakeboard::config::{project_paths, Args, Settings};

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = project_paths()?;
    let mut settings = Settings::load(args.config.as_deref(), &paths)?;
    settings.apply_args(&args);

    // the terminal belongs to the board, so the log goes to a file
    let log_path = settings.log_file.clone().unwrap_or_else(|| paths.log_path.clone());
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let log_file = File::create(&log_path)
        .with_context(|| format!("could not create log file {}", log_path.display()))?;
    WriteLogger::init(settings.log_level(), Config::default(), log_file)
        .context("failed to initialize logger")?;
    info!("starting snakeboard, settings {:?}", settings);

    app::run(&args, &settings, &paths)
}
