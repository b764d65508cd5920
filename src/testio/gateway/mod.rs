//! Gateways for the TestIO device catalog and customer APIs.
//!
//! Traits keep the resolver and orchestrator testable with mocks, while the
//! `reqwest` implementations perform the real HTTP requests.

mod catalog;
mod client;
mod error_mapping;
mod exploratory;

pub use catalog::{DEFAULT_DEVICES_API_URL, DeviceCatalogClient};
pub use exploratory::{DEFAULT_CUSTOMER_API_URL, ExploratoryTestClient};

use async_trait::async_trait;

use crate::error::TriggerError;
use crate::payload::TestPayload;

use super::models::{Category, CreatedTest, OperatingSystem, VersionPage};

/// Read-only access to the provider's device catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceCatalog: Send + Sync {
    /// List all device categories.
    async fn categories(&self) -> Result<Vec<Category>, TriggerError>;

    /// List the operating systems available in a category.
    async fn operating_systems(
        &self,
        category_id: u64,
    ) -> Result<Vec<OperatingSystem>, TriggerError>;

    /// Fetch one page of versions for an operating system.
    async fn operating_system_versions(
        &self,
        operating_system_id: u64,
        offset: u64,
    ) -> Result<VersionPage, TriggerError>;
}

/// Submission of exploratory tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExploratoryTestGateway: Send + Sync {
    /// Create an exploratory test from the payload.
    async fn create_exploratory_test(
        &self,
        payload: &TestPayload,
    ) -> Result<CreatedTest, TriggerError>;
}
