//! Logger setup for the `hoist` binary

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}";

/// Install the global logger.
///
/// With a config file, log4rs reads appenders and levels from it. Otherwise
/// everything at `level` or above goes to stderr, keeping stdout free for
/// command output.
pub fn init(level: LevelFilter, config_file: Option<&Path>) -> Result<()> {
    if let Some(path) = config_file {
        return log4rs::init_file(path, Default::default())
            .with_context(|| format!("Failed to load log config {}", path.display()));
    }

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))
        .context("Invalid logger configuration")?;

    log4rs::init_config(config).context("Logger already installed")?;
    Ok(())
}
