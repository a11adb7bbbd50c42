use admin_api::access::{RoleGuard, ADMIN_ROLE, EVENT_MANAGER_ROLE, SELLER_ROLE};
use admin_api::session::storage::FileSessionStorage;
use admin_api::session::SessionContext;
use admin_api::{ApiSettings, AuthApi};
use admin_runners::logging::init_logger;
use anyhow::{Context, Result};
use base::requests::ureq::UreqRequestApi;
use log::info;

const ADMIN_EMAIL_ENV: &str = "ADMIN_EMAIL";
const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logger()?;

    let settings = ApiSettings::from_env()?;
    let email = dotenv::var(ADMIN_EMAIL_ENV)
        .context(format!("{} env variable is not set", ADMIN_EMAIL_ENV))?;
    let password = dotenv::var(ADMIN_PASSWORD_ENV)
        .context(format!("{} env variable is not set", ADMIN_PASSWORD_ENV))?;

    let session = SessionContext::new(Box::new(FileSessionStorage::new(&settings.session_dir)));
    let request_api = UreqRequestApi::with_timeout(settings.request_timeout);
    let auth = AuthApi::new(&settings, &session, &request_api);

    let logged_in = auth.login(&email, &password)?;

    if let Err(err) =
        RoleGuard::any_of(&[ADMIN_ROLE, SELLER_ROLE, EVENT_MANAGER_ROLE]).check(&session)
    {
        auth.logout()?;
        return Err(err).context(format!("{} cannot use the admin console", email));
    }

    info!(
        target: &settings.target_logger,
        "the session of {} with roles {:?} is stored in {}",
        email,
        logged_in.roles,
        settings.session_dir.display()
    );

    Ok(())
}
