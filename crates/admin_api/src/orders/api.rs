use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpRequestMethod, HttpResponse};
use base::requests::request_json;
use base::ApiError;
use log::{info, warn};

use crate::auth::TokenRefresher;
use crate::authenticated_request::AuthenticatedRequestApi;
use crate::listing::{ListQuery, Page};
use crate::orders::{check_status_update, OrderItem, OrderItemStatus, OrderStatusUpdate};
use crate::settings::ApiSettings;

pub const ORDERS_PATH: &str = "orders";
pub const ORDER_STATUS_PATH: &str = "orders/status";

pub struct OrdersApi<'a, R, F>
where
    R: SyncHttpRequest,
    F: TokenRefresher,
{
    settings: &'a ApiSettings,
    request_api: &'a AuthenticatedRequestApi<'a, R, F>,
}

impl<'a, R, F> OrdersApi<'a, R, F>
where
    R: SyncHttpRequest,
    F: TokenRefresher,
{
    pub fn new(
        settings: &'a ApiSettings,
        request_api: &'a AuthenticatedRequestApi<'a, R, F>,
    ) -> Self {
        Self {
            settings,
            request_api,
        }
    }

    pub fn list_orders(&self, query: &ListQuery) -> Result<Page<OrderItem>, ApiError> {
        let req = HttpRequestData::new(HttpRequestMethod::Get, &self.settings.endpoint(ORDERS_PATH))
            .with_queries(query.to_queries());

        request_json(&req, "orders", &self.settings.target_logger, self.request_api)
    }

    /// Sends the status update once the transition and its form fields pass the
    /// client-side checks. Nothing is sent when they don't.
    pub fn update_status(
        &self,
        current: OrderItemStatus,
        update: &OrderStatusUpdate,
    ) -> Result<HttpResponse, ApiError> {
        if let Err(err) = check_status_update(current, update) {
            warn!(
                target: &self.settings.target_logger,
                "the status update of the order {} is rejected: {}", update.order_id, err
            );
            return Err(err);
        }

        let req = HttpRequestData::new(
            HttpRequestMethod::Put,
            &self.settings.endpoint(ORDER_STATUS_PATH),
        )
        .with_serialized_body(update)?;

        let response = self.request_api.call(&req)?;

        info!(
            target: &self.settings.target_logger,
            "the order {} was moved from {} to {}", update.order_id, current, update.status
        );

        Ok(response)
    }
}
