//! Error mapping helpers for the TestIO gateways.

use reqwest::Response;

use crate::error::TriggerError;

const MAX_BODY_CHARS: usize = 160;

/// Maps a transport failure; timeouts and connection errors are network
/// errors, anything else is reported as an upstream failure.
pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> TriggerError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        TriggerError::Network {
            message: format!("{operation} failed: {error}"),
        }
    } else {
        TriggerError::Upstream {
            status: error.status().map(|status| status.as_u16()),
            message: format!("{operation} failed: {error}"),
        }
    }
}

/// Converts a non-success response into an upstream error carrying the
/// provider's `error` message when the body has one.
pub(super) async fn error_from_response(operation: &str, response: Response) -> TriggerError {
    let status = response.status();
    let message = response.text().await.map_or_else(
        |_| "(failed to read error response body)".to_owned(),
        |body| extract_provider_message(&body).unwrap_or_else(|| truncate_for_message(&body)),
    );

    TriggerError::Upstream {
        status: Some(status.as_u16()),
        message: format!(
            "{operation} failed with status {}: {message}",
            status.as_u16()
        ),
    }
}

pub(super) fn extract_provider_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("error")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

fn truncate_for_message(message: &str) -> String {
    let mut output: String = message.chars().take(MAX_BODY_CHARS).collect();
    if message.chars().nth(MAX_BODY_CHARS).is_some() {
        output.push_str("...");
    }
    output
}
