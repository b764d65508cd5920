//! `reqwest` implementation of the device catalog gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TriggerError;
use crate::testio::models::{
    CategoriesResponse, Category, OperatingSystem, OperatingSystemsResponse, VersionPage,
};

use super::DeviceCatalog;
use super::client::{build_http_client, endpoint, send_json};

/// Public device catalog endpoint.
pub const DEFAULT_DEVICES_API_URL: &str = "http://devices.test.io/api";

/// Device catalog client.
///
/// The catalog is public and is queried without credentials.
#[derive(Debug, Clone)]
pub struct DeviceCatalogClient {
    client: Client,
    base_url: String,
}

impl DeviceCatalogClient {
    /// Creates a catalog client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TriggerError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(endpoint(&self.base_url, path))
    }
}

#[async_trait]
impl DeviceCatalog for DeviceCatalogClient {
    async fn categories(&self) -> Result<Vec<Category>, TriggerError> {
        send_json::<CategoriesResponse>("list categories", self.get("categories"))
            .await
            .map(|response| response.categories)
    }

    async fn operating_systems(
        &self,
        category_id: u64,
    ) -> Result<Vec<OperatingSystem>, TriggerError> {
        let request = self
            .get("operating_systems")
            .query(&[("filter[category]", category_id)]);
        send_json::<OperatingSystemsResponse>("list operating systems", request)
            .await
            .map(|response| response.operating_systems)
    }

    async fn operating_system_versions(
        &self,
        operating_system_id: u64,
        offset: u64,
    ) -> Result<VersionPage, TriggerError> {
        let request = self.get("operating_system_versions").query(&[
            ("filter[operating_system]", operating_system_id),
            ("offset", offset),
        ]);
        send_json("list operating system versions", request).await
    }
}
