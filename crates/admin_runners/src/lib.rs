pub mod commands;
pub mod logging;

use admin_api::session::storage::FileSessionStorage;
use admin_api::session::SessionContext;
use admin_api::ApiSettings;
use anyhow::Result;

/// Loads the settings and the session persisted by a previous login.
pub fn restore_environment() -> Result<(ApiSettings, SessionContext)> {
    dotenv::dotenv().ok();

    let settings = ApiSettings::from_env()?;
    let session =
        SessionContext::restore(Box::new(FileSessionStorage::new(&settings.session_dir)))?;

    Ok((settings, session))
}
