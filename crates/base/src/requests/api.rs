use crate::errors::ApiError;
use crate::requests::entities::{HttpRequestData, HttpResponse};

/// Blocking transport for the admin backend.
///
/// Implementations return `Ok` for 2xx responses only. Any other status is
/// reported as [`ApiError::Http`] with the response body, and transport failures
/// as [`ApiError::Network`]. Layers wrapping a transport may add their own
/// failures, e.g. [`ApiError::Auth`].
pub trait SyncHttpRequest {
    fn call(&self, req: &HttpRequestData) -> Result<HttpResponse, ApiError>;
}

impl<T: SyncHttpRequest + ?Sized> SyncHttpRequest for &T {
    fn call(&self, req: &HttpRequestData) -> Result<HttpResponse, ApiError> {
        (**self).call(req)
    }
}
