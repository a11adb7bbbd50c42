use anyhow::{Context, Result};
use base::entities::AccessToken;
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpRequestMethod};
use base::requests::request_json;
use log::{error, info, warn};
use serde_json::json;

use crate::session::{Session, SessionContext, SessionRecord, TokenPair};
use crate::settings::ApiSettings;

pub const LOGIN_PATH: &str = "auth/login";
pub const REFRESH_TOKEN_PATH: &str = "auth/refresh-token";

/// Exchanges the stored refresh token for a new access token.
///
/// `Ok(None)` means the refresh produced no usable token. Implementations are
/// responsible for persisting the new tokens into the session context.
pub trait TokenRefresher {
    fn refresh(&self) -> Result<Option<AccessToken>>;
}

pub struct HttpTokenRefresher<'a, R>
where
    R: SyncHttpRequest,
{
    settings: &'a ApiSettings,
    session: &'a SessionContext,
    request_api: &'a R,
}

impl<'a, R> HttpTokenRefresher<'a, R>
where
    R: SyncHttpRequest,
{
    pub fn new(settings: &'a ApiSettings, session: &'a SessionContext, request_api: &'a R) -> Self {
        Self {
            settings,
            session,
            request_api,
        }
    }

    fn request_tokens(&self) -> Result<Option<TokenPair>> {
        let refresh_token = match self.session.refresh_token() {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(None),
        };

        let req = HttpRequestData::new(
            HttpRequestMethod::Post,
            &self.settings.endpoint(REFRESH_TOKEN_PATH),
        )
        .with_json_body(json!({ "refreshToken": refresh_token }));

        let tokens: TokenPair = request_json(
            &req,
            "a token refresh",
            &self.settings.target_logger,
            self.request_api,
        )?;

        if tokens.access_token.is_empty() {
            return Ok(None);
        }

        Ok(Some(tokens))
    }
}

impl<'a, R> TokenRefresher for HttpTokenRefresher<'a, R>
where
    R: SyncHttpRequest,
{
    fn refresh(&self) -> Result<Option<AccessToken>> {
        match self.request_tokens() {
            Ok(Some(tokens)) => {
                let access_token = tokens.access_token.clone();
                self.session.update(tokens)?;

                info!(target: &self.settings.target_logger, "the access token was refreshed");

                Ok(Some(access_token))
            }
            Ok(None) => {
                warn!(
                    target: &self.settings.target_logger,
                    "a token refresh returned no access token, the session is cleared"
                );
                self.session.clear()?;
                Ok(None)
            }
            Err(err) => {
                error!(
                    target: &self.settings.target_logger,
                    "a token refresh failed, the session is cleared: {:?}", err
                );
                self.session
                    .clear()
                    .context("an error occurred on clearing a session after a failed refresh")?;
                Err(err.context("an error occurred on refreshing the access token"))
            }
        }
    }
}

pub struct AuthApi<'a, R>
where
    R: SyncHttpRequest,
{
    settings: &'a ApiSettings,
    session: &'a SessionContext,
    request_api: &'a R,
}

impl<'a, R> AuthApi<'a, R>
where
    R: SyncHttpRequest,
{
    pub fn new(settings: &'a ApiSettings, session: &'a SessionContext, request_api: &'a R) -> Self {
        Self {
            settings,
            session,
            request_api,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let req = HttpRequestData::new(HttpRequestMethod::Post, &self.settings.endpoint(LOGIN_PATH))
            .with_json_body(json!({ "email": email, "password": password }));

        let record: SessionRecord = request_json(
            &req,
            "a login",
            &self.settings.target_logger,
            self.request_api,
        )
        .context(format!("an error occurred on logging in as {}", email))?;

        let session = Session::from(&record);
        self.session.start(record)?;

        info!(
            target: &self.settings.target_logger,
            "logged in as {} with roles {:?}", email, session.roles
        );

        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!(target: &self.settings.target_logger, "logged out");
        Ok(())
    }
}
