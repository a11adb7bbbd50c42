use base::errors::UNAUTHORIZED;
use base::ApiError;

use crate::session::SessionContext;

pub const ADMIN_ROLE: &str = "admin";
pub const SELLER_ROLE: &str = "seller";
pub const EVENT_MANAGER_ROLE: &str = "event_manager";

/// Requires the session to hold at least one of the listed roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    required: Vec<&'static str>,
}

impl RoleGuard {
    pub fn any_of(required: &[&'static str]) -> Self {
        Self {
            required: required.to_vec(),
        }
    }

    pub fn admin() -> Self {
        Self::any_of(&[ADMIN_ROLE])
    }

    pub fn check(&self, session: &SessionContext) -> Result<(), ApiError> {
        if !session.is_authenticated() {
            return Err(ApiError::Auth {
                status: UNAUTHORIZED,
                body: String::from("login is required"),
            });
        }

        if session.has_any_role(&self.required) {
            Ok(())
        } else {
            Err(ApiError::AccessDenied {
                required: self.required.iter().map(|role| role.to_string()).collect(),
            })
        }
    }
}
