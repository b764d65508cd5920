//! Error mapping helpers for the Octocrab gateway.

use http::StatusCode;

use crate::error::TriggerError;

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> TriggerError {
    if let octocrab::Error::GitHub { source, .. } = error {
        let status = source.status_code;
        return if is_auth_failure(status) {
            TriggerError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    message = source.message
                ),
            }
        } else {
            TriggerError::Upstream {
                status: Some(status.as_u16()),
                message: format!(
                    "{operation} failed with status {code}: {message}",
                    code = status.as_u16(),
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return TriggerError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    TriggerError::Upstream {
        status: None,
        message: format!("{operation} failed: {error}"),
    }
}
