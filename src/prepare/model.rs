//! Data models for the maintainer-authored prepare request.

use serde::{Deserialize, Serialize};

/// The JSON object a maintainer posts to request an exploratory test.
///
/// Instances are only produced by
/// [`PrepareSchema::parse_prepare`](super::PrepareSchema::parse_prepare),
/// after the raw JSON has passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    /// Where and how testers reach the build under test.
    pub test_environment: TestEnvironment,
    /// The feature to explore.
    pub feature: Feature,
    /// Optional device constraint; triggers catalog resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceSpec>,
    /// Optional free-text instructions for the testers.
    #[serde(
        rename = "additionalInstructions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_instructions: Option<String>,
}

/// Test environment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEnvironment {
    /// URL of the deployed build.
    pub url: String,
    /// Access instructions or credentials.
    pub access: String,
}

/// Feature description handed to the testers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature name.
    pub title: String,
    /// What the feature does.
    pub description: String,
    /// Where to find it in the product.
    pub howtofind: String,
    /// User stories, in the order the maintainer wrote them.
    pub user_stories: Vec<String>,
}

/// Human-readable device constraint, e.g. `ios smartphones 10.1 to 15`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Operating system key or display name.
    pub os: String,
    /// Device category key or display name.
    pub category: String,
    /// Lowest OS version to test on.
    pub min: String,
    /// Highest OS version to test on, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}
