use log::{debug, info, LevelFilter};
use std::path::{Path, PathBuf};

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};
use crate::types::{LogAction, ReconciliationResult};

/// Environment variable overriding the configured level
pub const LOG_ENV: &str = "NUGGETS_LOG";

const LOG_FILE: &str = "nuggets-media.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;
const ARCHIVED_LOGS: u32 = 5;

/// Initialize a rotating file logger in `log_dir`.
///
/// Returns the path of the active log file.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join(LOG_FILE);
    let archived_logs_pattern = log_dir.join("nuggets-media.{}.log");

    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern.to_string_lossy(), ARCHIVED_LOGS)
        .map_err(|e| Error::Configuration(format!("Failed to create log roller: {}", e)))?;

    let compound_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(MAX_LOG_BYTES)),
        Box::new(file_roller),
    );

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| Error::Configuration(format!("Failed to create log appender: {}", e)))?;

    let level = env_level().unwrap_or(level);
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| Error::Configuration(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Configuration(format!("Failed to initialize log4rs: {}", e)))?;

    info!("Logging to file: {}", log_file_path.display());
    Ok(log_file_path)
}

/// Level from `NUGGETS_LOG`, if set and valid
pub fn env_level() -> Option<LevelFilter> {
    std::env::var(LOG_ENV).ok()?.parse().ok()
}

/// Log the audit trail of a reconcile call at debug level
pub fn log_reconciliation(post_id: &str, result: &ReconciliationResult) {
    for entry in &result.logs {
        let action = match entry.action {
            LogAction::Preserved => "preserved",
            LogAction::Removed => "removed",
            LogAction::Moved => "moved",
            LogAction::Restored => "restored",
            LogAction::Deleted => "deleted",
        };
        debug!(
            "RECONCILE - Post: {}, Action: {}, Reason: {:?}, Value: {}",
            post_id, action, entry.reason, entry.value
        );
    }
}
