use thiserror::Error;

pub type StatusCode = u16;
pub type ResponseBody = String;

pub const UNAUTHORIZED: StatusCode = 401;

/// Failures surfaced by the admin backend clients.
///
/// Transports only ever produce [`ApiError::Network`] and [`ApiError::Http`];
/// the authenticated layer turns an unrecoverable 401 into [`ApiError::Auth`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("authorization failed with a code {status}: {body}")]
    Auth {
        status: StatusCode,
        body: ResponseBody,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with a code {status}: {body}")]
    Http {
        status: StatusCode,
        body: ResponseBody,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("access denied, one of the roles {required:?} is required")]
    AccessDenied { required: Vec<String> },

    #[error("unable to decode a response: {0}")]
    Decode(String),

    #[error("unable to encode a request body: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Http {
                status: UNAUTHORIZED,
                ..
            } | ApiError::Auth { .. }
        )
    }

    /// Converts a transport-level 401 into an authorization failure,
    /// leaving every other error as is.
    pub fn into_auth(self) -> Self {
        match self {
            ApiError::Http {
                status: UNAUTHORIZED,
                body,
            } => ApiError::Auth {
                status: UNAUTHORIZED,
                body,
            },
            other => other,
        }
    }
}
