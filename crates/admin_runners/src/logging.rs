use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

pub const LOG_FILE_ENV: &str = "LOG_FILE";

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} [{t}] {m}{n}";
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const NUMBER_OF_ARCHIVED_LOG_FILES: u32 = 5;

pub fn build_config(log_file: Option<&Path>, level: LevelFilter) -> Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("stdout", Box::new(stdout)));
    let mut root = Root::builder().appender("stdout");

    if let Some(path) = log_file {
        let roller = FixedWindowRoller::builder()
            .build(
                &format!("{}.{{}}.gz", path.display()),
                NUMBER_OF_ARCHIVED_LOG_FILES,
            )
            .map_err(|e| anyhow!("an error occurred on building a log roller: {}", e))?;

        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(MAX_LOG_FILE_SIZE)),
            Box::new(roller),
        );

        let file = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path, Box::new(policy))
            .context(format!(
                "an error occurred on opening a log file {}",
                path.display()
            ))?;

        config = config.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    config
        .build(root.build(level))
        .context("an error occurred on building a logger config")
}

/// Logs to stdout and, when `LOG_FILE` is set, to a size-rotated file.
pub fn init_logger() -> Result<Handle> {
    let log_file = dotenv::var(LOG_FILE_ENV).ok();
    let config = build_config(log_file.as_deref().map(Path::new), LevelFilter::Info)?;

    log4rs::init_config(config).context("an error occurred on initializing a logger")
}
