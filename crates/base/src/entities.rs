pub const TARGET_LOGGER_ENV: &str = "TARGET_LOGGER";
pub const DEFAULT_TARGET_LOGGER: &str = "admin";

pub type LoggerTarget = String;
pub type AccessToken = String;
pub type RefreshToken = String;

pub fn target_logger() -> LoggerTarget {
    dotenv::var(TARGET_LOGGER_ENV).unwrap_or_else(|_| String::from(DEFAULT_TARGET_LOGGER))
}
