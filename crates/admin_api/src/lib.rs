pub mod access;
pub mod auth;
pub mod authenticated_request;
pub mod listing;
pub mod orders;
pub mod session;
pub mod settings;

pub use crate::auth::{AuthApi, HttpTokenRefresher, TokenRefresher};
pub use crate::authenticated_request::AuthenticatedRequestApi;
pub use crate::orders::{is_transition_allowed, OrderItemStatus, OrdersApi};
pub use crate::session::{Session, SessionContext};
pub use crate::settings::ApiSettings;
