use admin_api::access::{RoleGuard, ADMIN_ROLE, SELLER_ROLE};
use admin_api::{AuthenticatedRequestApi, HttpTokenRefresher, OrdersApi};
use admin_runners::commands::OrderStatusCommand;
use admin_runners::logging::init_logger;
use admin_runners::restore_environment;
use anyhow::{Context, Result};
use base::requests::ureq::UreqRequestApi;
use log::info;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = OrderStatusCommand::from_args(&args)?;

    let (settings, session) = restore_environment()?;
    init_logger()?;

    RoleGuard::any_of(&[ADMIN_ROLE, SELLER_ROLE]).check(&session)?;

    let transport = UreqRequestApi::with_timeout(settings.request_timeout);
    let refresher = HttpTokenRefresher::new(&settings, &session, &transport);
    let request_api =
        AuthenticatedRequestApi::new(&session, &transport, &refresher, &settings.target_logger);
    let orders = OrdersApi::new(&settings, &request_api);

    let response = orders
        .update_status(command.current, &command.update)
        .context(format!(
            "an error occurred on updating the status of the order {}",
            command.update.order_id
        ))?;

    info!(
        target: &settings.target_logger,
        "the backend answered with a code {}: {}", response.status, response.body
    );

    Ok(())
}
