use std::time::Duration;

use ureq::{Agent, AgentBuilder, Error};

use crate::errors::ApiError;
use crate::requests::api::SyncHttpRequest;
use crate::requests::entities::{HttpRequestData, HttpResponse};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct UreqRequestApi {
    agent: Agent,
}

impl Default for UreqRequestApi {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl UreqRequestApi {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl SyncHttpRequest for UreqRequestApi {
    fn call(&self, req: &HttpRequestData) -> Result<HttpResponse, ApiError> {
        let mut request = self.agent.request(&req.method.to_string(), &req.url);

        for (header, value) in &req.headers {
            request = request.set(header, value);
        }

        for (param, value) in &req.queries {
            request = request.query(param, value);
        }

        let res = if let Some(body) = &req.body {
            request.send_json(body.clone())
        } else {
            request.call()
        };

        match res {
            Ok(resp) => {
                let status = resp.status();
                let body = resp
                    .into_string()
                    .map_err(|e| ApiError::Network(e.to_string()))?;

                Ok(HttpResponse { status, body })
            }
            Err(Error::Status(status, resp)) => Err(ApiError::Http {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(e) => Err(ApiError::Network(format!(
                "request {} {} failed: {}",
                req.method, req.url, e
            ))),
        }
    }
}
