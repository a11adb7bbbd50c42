use std::cell::RefCell;
use std::sync::Arc;

use admin_api::authenticated_request::AuthenticatedRequestApi;
use admin_api::listing::{ListQuery, SortOrder};
use admin_api::orders::{OrderItemStatus, OrderStatusUpdate, OrdersApi};
use admin_api::session::storage::{FileSessionStorage, InMemorySessionStorage};
use admin_api::session::{SessionContext, SessionRecord};
use admin_api::{ApiSettings, HttpTokenRefresher};
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpRequestMethod, HttpResponse};
use base::ApiError;
use log::Level;

const BASE_URL: &str = "http://admin.local/api";

/// Backend double that accepts exactly one access token.
struct FakeBackend {
    valid_token: RefCell<String>,
    rotated_token: String,
    refresh_available: bool,
    requests: RefCell<Vec<HttpRequestData>>,
}

impl FakeBackend {
    fn new(valid_token: &str, rotated_token: &str, refresh_available: bool) -> Self {
        Self {
            valid_token: RefCell::new(valid_token.to_string()),
            rotated_token: rotated_token.to_string(),
            refresh_available,
            requests: RefCell::new(Vec::new()),
        }
    }

    fn requests_to(&self, path: &str) -> Vec<HttpRequestData> {
        let url = format!("{}/{}", BASE_URL, path);
        self.requests
            .borrow()
            .iter()
            .filter(|req| req.url == url)
            .cloned()
            .collect()
    }
}

impl SyncHttpRequest for FakeBackend {
    fn call(&self, req: &HttpRequestData) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(req.clone());

        if req.url.ends_with("/auth/refresh-token") {
            if !self.refresh_available {
                return Err(ApiError::Http {
                    status: 401,
                    body: String::from("refresh token expired"),
                });
            }

            *self.valid_token.borrow_mut() = self.rotated_token.clone();
            return Ok(HttpResponse::new(
                200,
                &format!(
                    r#"{{"accessToken":"{}","refreshToken":"R2"}}"#,
                    self.rotated_token
                ),
            ));
        }

        let expected = format!("Bearer {}", self.valid_token.borrow());
        if req.header("Authorization") != Some(expected.as_str()) {
            return Err(ApiError::Http {
                status: 401,
                body: String::from("jwt expired"),
            });
        }

        if req.url.ends_with("/orders") {
            return Ok(HttpResponse::new(
                200,
                r#"{
                    "items": [
                        {"id": "i-1", "orderId": "o-1", "productName": "Lamp", "quantity": 2, "status": "placed"},
                        {"id": "i-2", "orderId": "o-2", "status": "shipped", "trackingId": "TRK-9", "carrierPartner": "DHL"}
                    ],
                    "total": 12,
                    "page": 1,
                    "limit": 2
                }"#,
            ));
        }

        Ok(HttpResponse::new(200, r#"{"message":"status updated"}"#))
    }
}

fn record(access_token: &str) -> SessionRecord {
    SessionRecord {
        user_id: String::from("u-1"),
        email: String::from("admin@example.com"),
        name: String::from("Admin"),
        role: vec![String::from("admin")],
        profile_image: Some(String::from("https://cdn.example.com/u-1.png")),
        access_token: access_token.to_string(),
        refresh_token: String::from("R1"),
    }
}

#[test]
fn should_refresh_expired_token_and_keep_using_new_one() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ApiSettings::new(BASE_URL);
    let session = SessionContext::new(Box::new(FileSessionStorage::new(dir.path())));
    session.start(record("T1")).unwrap();

    let backend = FakeBackend::new("T2", "T2", true);
    let refresher = HttpTokenRefresher::new(&settings, &session, &backend);
    let request_api = AuthenticatedRequestApi::new(&session, &backend, &refresher, "test");
    let orders = OrdersApi::new(&settings, &request_api);

    let update = OrderStatusUpdate::shipped("o-1", "TRK-1", "DHL");
    let response = orders
        .update_status(OrderItemStatus::Placed, &update)
        .unwrap();

    assert_eq!(response.status, 200);

    let status_requests = backend.requests_to("orders/status");
    assert_eq!(status_requests.len(), 2);
    assert_eq!(
        status_requests[0].header("Authorization"),
        Some("Bearer T1")
    );
    assert_eq!(
        status_requests[1].header("Authorization"),
        Some("Bearer T2")
    );
    assert_eq!(status_requests[1].method, HttpRequestMethod::Put);
    assert_eq!(
        status_requests[1].body,
        Some(serde_json::json!({
            "orderId": "o-1",
            "status": "shipped",
            "trackingId": "TRK-1",
            "carrierPartner": "DHL"
        }))
    );

    // the refreshed tokens survive a restart
    let restored =
        SessionContext::restore(Box::new(FileSessionStorage::new(dir.path()))).unwrap();
    assert_eq!(restored.access_token().as_deref(), Some("T2"));
    assert_eq!(restored.refresh_token().as_deref(), Some("R2"));

    let page = orders
        .list_orders(&ListQuery::page(1, 2).sorted_by("createdAt", SortOrder::Desc))
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].status, OrderItemStatus::Shipped);
    assert_eq!(page.total_pages(), 6);
    assert_eq!(backend.requests_to("auth/refresh-token").len(), 1);
    assert_eq!(
        backend.requests_to("orders")[0].header("Authorization"),
        Some("Bearer T2")
    );
}

#[test]
fn should_return_auth_error_and_clear_session_when_refresh_is_rejected() {
    let settings = ApiSettings::new(BASE_URL);
    let storage = Arc::new(InMemorySessionStorage::new());
    let session = SessionContext::new(Box::new(storage.clone()));
    session.start(record("T1")).unwrap();

    let backend = FakeBackend::new("T0", "T2", false);
    let refresher = HttpTokenRefresher::new(&settings, &session, &backend);
    let request_api = AuthenticatedRequestApi::new(&session, &backend, &refresher, "test");
    let orders = OrdersApi::new(&settings, &request_api);

    let err = orders.list_orders(&ListQuery::default()).unwrap_err();

    assert_eq!(
        err,
        ApiError::Auth {
            status: 401,
            body: String::from("jwt expired")
        }
    );
    assert_eq!(backend.requests_to("orders").len(), 1);
    assert!(!session.is_authenticated());
    assert_eq!(storage.stored(), None);
}

#[test]
fn should_not_send_illegal_status_transition() {
    let settings = ApiSettings::new(BASE_URL);
    let session = SessionContext::new(Box::new(InMemorySessionStorage::new()));
    session.start(record("T1")).unwrap();

    let backend = FakeBackend::new("T1", "T2", true);
    let refresher = HttpTokenRefresher::new(&settings, &session, &backend);
    let request_api = AuthenticatedRequestApi::new(&session, &backend, &refresher, "test");
    let orders = OrdersApi::new(&settings, &request_api);

    testing_logger::setup();

    let err = orders
        .update_status(
            OrderItemStatus::Shipped,
            &OrderStatusUpdate::cancelled("o-2", "customer changed mind"),
        )
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(backend.requests.borrow().is_empty());

    testing_logger::validate(|captured_logs| {
        let warnings = captured_logs
            .iter()
            .filter(|log| matches!(log.level, Level::Warn))
            .collect::<Vec<_>>();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].body.contains("o-2"));
    });
}

#[test]
fn should_not_send_shipping_without_tracking_details() {
    let settings = ApiSettings::new(BASE_URL);
    let session = SessionContext::new(Box::new(InMemorySessionStorage::new()));
    session.start(record("T1")).unwrap();

    let backend = FakeBackend::new("T1", "T2", true);
    let refresher = HttpTokenRefresher::new(&settings, &session, &backend);
    let request_api = AuthenticatedRequestApi::new(&session, &backend, &refresher, "test");
    let orders = OrdersApi::new(&settings, &request_api);

    let err = orders
        .update_status(
            OrderItemStatus::Placed,
            &OrderStatusUpdate::new("o-1", OrderItemStatus::Shipped),
        )
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Validation(String::from("a tracking id is required"))
    );
    assert!(backend.requests.borrow().is_empty());
}

struct MalformedOrdersBackend;

impl SyncHttpRequest for MalformedOrdersBackend {
    fn call(&self, _req: &HttpRequestData) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::new(200, r#"{"items": "not a list"}"#))
    }
}

#[test]
fn should_log_and_return_decode_error_on_malformed_orders_page() {
    let settings = ApiSettings::new(BASE_URL);
    let session = SessionContext::new(Box::new(InMemorySessionStorage::new()));
    session.start(record("T1")).unwrap();

    let backend = MalformedOrdersBackend;
    let refresher = HttpTokenRefresher::new(&settings, &session, &backend);
    let request_api = AuthenticatedRequestApi::new(&session, &backend, &refresher, "test");
    let orders = OrdersApi::new(&settings, &request_api);

    testing_logger::setup();

    let err = orders.list_orders(&ListQuery::default()).unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));

    testing_logger::validate(|captured_logs| {
        let errors = captured_logs
            .iter()
            .filter(|log| matches!(log.level, Level::Error))
            .collect::<Vec<_>>();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].body.contains("decoding orders"));
    });
}
