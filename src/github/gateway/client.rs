//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;

use crate::error::TriggerError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns [`TriggerError::Configuration`] when the base URI cannot be
/// parsed, or the mapped Octocrab error when the client cannot be built.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, TriggerError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| TriggerError::Configuration {
            message: format!("GitHub API URL '{api_base}' is invalid: {error}"),
        })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| TriggerError::Configuration {
            message: format!("build GitHub client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
