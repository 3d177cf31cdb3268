use log::{error, info, LevelFilter};
use std::path::Path;

use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Environment variable overriding the file log level
pub const LOG_LEVEL_ENV: &str = "IMAGE_GROUPER_LOG";

const LOG_FILE_NAME: &str = "image-grouper.log";
const ARCHIVE_PATTERN: &str = "image-grouper.{}.log";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const ARCHIVE_COUNT: u32 = 5;
const LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}";

fn setup_error(what: &str, e: impl std::fmt::Display) -> Error {
    Error::Configuration(format!("Failed to {}: {}", what, e))
}

/// `IMAGE_GROUPER_LOG` wins over `requested` when it holds a valid level
fn resolve_level(requested: LevelFilter) -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(requested)
}

/// Install a size-rotated file logger under `log_dir`.
///
/// Nothing goes to stderr, so progress bars stay readable.
pub fn init_logger(log_dir: impl AsRef<Path>, level: LevelFilter) -> Result<()> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let archive_path = log_dir.join(ARCHIVE_PATTERN);

    let roller = FixedWindowRoller::builder()
        .build(&archive_path.to_string_lossy(), ARCHIVE_COUNT)
        .map_err(|e| setup_error("create log roller", e))?;
    let policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(ROTATE_AT_BYTES)),
        Box::new(roller),
    );

    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LINE_PATTERN)))
        .build(&log_path, Box::new(policy))
        .map_err(|e| setup_error("open log file", e))?;

    let level = resolve_level(level);
    let config = Config::builder()
        .appender(Appender::builder().build("rolling", Box::new(appender)))
        .build(Root::builder().appender("rolling").build(level))
        .map_err(|e| setup_error("build log config", e))?;

    log4rs::init_config(config).map_err(|e| setup_error("install logger", e))?;

    info!("Logging at {} to {}", level, log_path.display());
    Ok(())
}

/// Report a per-item fingerprint failure
pub fn log_hash_error(identifier: &str, error: &dyn std::error::Error) {
    error!("Could not fingerprint '{}': {}", identifier, error);
}
