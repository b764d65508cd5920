//! `reqwest` implementation of the exploratory test gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TriggerError;
use crate::payload::TestPayload;
use crate::testio::models::{ApiToken, CreateTestResponse, CreatedTest, ProductId};

use super::ExploratoryTestGateway;
use super::client::{build_http_client, endpoint, send_json};

/// TestIO customer API endpoint.
pub const DEFAULT_CUSTOMER_API_URL: &str = "https://api.test.io/customer/v2";

/// Customer API client bound to one product.
#[derive(Debug, Clone)]
pub struct ExploratoryTestClient {
    client: Client,
    base_url: String,
    product_id: ProductId,
    token: ApiToken,
}

impl ExploratoryTestClient {
    /// Creates a client submitting tests for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        product_id: ProductId,
        token: ApiToken,
        timeout: Duration,
    ) -> Result<Self, TriggerError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
            product_id,
            token,
        })
    }
}

#[async_trait]
impl ExploratoryTestGateway for ExploratoryTestClient {
    async fn create_exploratory_test(
        &self,
        payload: &TestPayload,
    ) -> Result<CreatedTest, TriggerError> {
        let path = format!("products/{}/exploratory_tests", self.product_id.as_str());
        let request = self
            .client
            .post(endpoint(&self.base_url, &path))
            .bearer_auth(self.token.value())
            .json(payload);

        send_json::<CreateTestResponse>("create exploratory test", request)
            .await
            .map(|response| response.exploratory_test)
    }
}
