//! Wire model of the exploratory test submission body.

use serde::{Deserialize, Serialize};

use crate::testio::CatalogEntry;

/// Fixed test duration requested from the provider, in hours.
pub const TEST_DURATION: &str = "2";

/// Testing type requested from the provider.
pub const TESTING_TYPE: &str = "rapid";

/// Submission body, serialised as `{"exploratory_test": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPayload {
    /// The test to create.
    pub exploratory_test: ExploratoryTest,
}

/// Exploratory test definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploratoryTest {
    /// `[owner/repo/number]` followed by the pull request title.
    pub test_title: String,
    /// Environment the testers use.
    pub test_environment: PayloadEnvironment,
    /// Features under test; always exactly one.
    pub features: Vec<PayloadFeature>,
    /// Device requirements, absent when the request named no device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<DeviceRequirement>>,
    /// Free-text instructions; serialised as `null` when absent.
    pub instructions: Option<String>,
    /// Requested duration.
    pub duration: String,
    /// Requested testing type.
    pub testing_type: String,
}

/// Environment block of the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEnvironment {
    /// Environment title, capped at 80 characters.
    pub title: String,
    /// URL of the deployed build.
    pub url: String,
    /// Access instructions.
    pub access: String,
}

/// Feature block of the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFeature {
    /// Always `0`; the provider assigns ids to new features.
    pub id: u64,
    /// Feature name.
    pub title: String,
    /// What the feature does.
    pub description: String,
    /// Where to find it.
    pub howtofind: String,
    /// User stories in maintainer order.
    pub user_stories: Vec<String>,
}

/// Device constraint with every name resolved to a catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRequirement {
    /// Device category.
    pub category: CatalogEntry,
    /// Operating system.
    pub operating_system: CatalogEntry,
    /// Lowest OS version.
    pub min_operating_system_version: CatalogEntry,
    /// Highest OS version; `null` when unbounded.
    pub max_operating_system_version: Option<CatalogEntry>,
}
