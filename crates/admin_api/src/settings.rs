use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use base::entities::{target_logger, LoggerTarget};
use base::requests::ureq::DEFAULT_REQUEST_TIMEOUT;

pub const ADMIN_API_URL_ENV: &str = "ADMIN_API_URL";
pub const REQUEST_TIMEOUT_SECS_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const SESSION_DIR_ENV: &str = "SESSION_DIR";

const DEFAULT_SESSION_DIR: &str = ".";

pub type ApiUrl = String;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: ApiUrl,
    pub request_timeout: Duration,
    pub session_dir: PathBuf,
    pub target_logger: LoggerTarget,
}

impl ApiSettings {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            target_logger: target_logger(),
        }
    }

    /// Reads the settings from the environment (and a `.env` file if the caller loaded one).
    pub fn from_env() -> Result<Self> {
        let base_url = dotenv::var(ADMIN_API_URL_ENV)
            .context(format!("{} env variable is not set", ADMIN_API_URL_ENV))?;

        let mut settings = Self::new(&base_url);

        if let Ok(timeout) = dotenv::var(REQUEST_TIMEOUT_SECS_ENV) {
            settings.request_timeout = parse_request_timeout(&timeout).context(format!(
                "invalid {} value: {}",
                REQUEST_TIMEOUT_SECS_ENV, timeout
            ))?;
        }

        if let Ok(session_dir) = dotenv::var(SESSION_DIR_ENV) {
            settings.session_dir = PathBuf::from(session_dir);
        }

        Ok(settings)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Parses a whole number of seconds. Zero is rejected.
fn parse_request_timeout(value: &str) -> Result<Duration> {
    let secs: u64 = value.trim().parse()?;

    if secs == 0 {
        bail!("the request timeout must be at least one second");
    }

    Ok(Duration::from_secs(secs))
}
