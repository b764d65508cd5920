//! HTTP client construction and request helpers shared by the gateways.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::TriggerError;

use super::error_mapping::{error_from_response, map_transport_error};

/// Builds a `reqwest` client with an explicit request timeout.
///
/// # Errors
///
/// Returns [`TriggerError::Configuration`] when the TLS backend cannot be
/// initialised.
pub(super) fn build_http_client(timeout: Duration) -> Result<Client, TriggerError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| TriggerError::Configuration {
            message: format!("failed to configure TestIO HTTP client: {error}"),
        })
}

/// Joins a base URL and an endpoint path without doubling slashes.
pub(super) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Sends the request and decodes a successful JSON response.
pub(super) async fn send_json<T: DeserializeOwned>(
    operation: &str,
    request: RequestBuilder,
) -> Result<T, TriggerError> {
    let response = request
        .send()
        .await
        .map_err(|error| map_transport_error(operation, &error))?;

    if !response.status().is_success() {
        return Err(error_from_response(operation, response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|error| TriggerError::Upstream {
            status: None,
            message: format!("{operation} response JSON decoding failed: {error}"),
        })
}
