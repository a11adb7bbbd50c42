use base::entities::AccessToken;
use base::errors::UNAUTHORIZED;
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpResponse};
use base::ApiError;
use log::{error, warn};

use crate::auth::TokenRefresher;
use crate::session::SessionContext;

const NO_ACTIVE_SESSION: &str = "there is no active session";

/// Sends requests with the session's bearer token.
///
/// A 401 answer triggers exactly one token refresh and exactly one retry.
/// Refreshes are serialized on the session's refresh lock: a caller that finds
/// the token already rotated by someone else while it was waiting retries with
/// the rotated token instead of refreshing a second time.
pub struct AuthenticatedRequestApi<'a, R, F>
where
    R: SyncHttpRequest,
    F: TokenRefresher,
{
    session: &'a SessionContext,
    request_api: &'a R,
    refresher: &'a F,
    target_logger: &'a str,
}

impl<'a, R, F> AuthenticatedRequestApi<'a, R, F>
where
    R: SyncHttpRequest,
    F: TokenRefresher,
{
    pub fn new(
        session: &'a SessionContext,
        request_api: &'a R,
        refresher: &'a F,
        target_logger: &'a str,
    ) -> Self {
        Self {
            session,
            request_api,
            refresher,
            target_logger,
        }
    }

    fn fresh_token(&self, rejected_token: &str) -> Option<AccessToken> {
        let _guard = self.session.lock_refresh();

        if let Some(current) = self.session.access_token() {
            if current != rejected_token {
                return Some(current);
            }
        }

        match self.refresher.refresh() {
            Ok(Some(token)) => Some(token),
            Ok(None) => {
                error!(
                    target: self.target_logger,
                    "a token refresh returned no access token"
                );
                None
            }
            Err(err) => {
                error!(
                    target: self.target_logger,
                    "an error occurred on refreshing the access token: {:?}", err
                );
                None
            }
        }
    }
}

impl<'a, R, F> SyncHttpRequest for AuthenticatedRequestApi<'a, R, F>
where
    R: SyncHttpRequest,
    F: TokenRefresher,
{
    fn call(&self, req: &HttpRequestData) -> Result<HttpResponse, ApiError> {
        let token = self.session.access_token().ok_or_else(|| ApiError::Auth {
            status: UNAUTHORIZED,
            body: String::from(NO_ACTIVE_SESSION),
        })?;

        let unauthorized = match self.request_api.call(&req.with_bearer_token(&token)) {
            Err(err) if err.is_unauthorized() => err,
            other => return other,
        };

        warn!(
            target: self.target_logger,
            "{} {} was rejected as unauthorized, refreshing the access token", req.method, req.url
        );

        let new_token = match self.fresh_token(&token) {
            Some(new_token) => new_token,
            None => return Err(unauthorized.into_auth()),
        };

        self.request_api
            .call(&req.with_bearer_token(&new_token))
            .map_err(ApiError::into_auth)
    }
}
