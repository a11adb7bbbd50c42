use log::error;
use serde::de::DeserializeOwned;

use crate::errors::ApiError;
use crate::requests::api::SyncHttpRequest;
use crate::requests::entities::HttpRequestData;

pub mod api;
pub mod entities;
pub mod ureq;

/// Issues the request once and decodes the JSON body of a successful response.
pub fn request_json<T: DeserializeOwned>(
    req: &HttpRequestData,
    req_entity_name: &str,
    target_logger: &str,
    request_api: &impl SyncHttpRequest,
) -> Result<T, ApiError> {
    let response = request_api.call(req).map_err(|e| {
        error!(
            target: target_logger,
            "an error occurred on requesting {}: {}", req_entity_name, e
        );
        e
    })?;

    response.json().map_err(|e| {
        error!(
            target: target_logger,
            "an error occurred on decoding {}: {}", req_entity_name, e
        );
        e
    })
}
