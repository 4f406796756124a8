use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

pub const LOG_FILE: &str = "skylight.log";

pub fn create_logger() -> Result<()> {
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            LevelFilter::max(),
            Config::default(),
            File::create(LOG_FILE)
                .with_context(|| format!("Failed to create log file named: {}", LOG_FILE))?,
        ),
    ])?;
    Ok(())
}
