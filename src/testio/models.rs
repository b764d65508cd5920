//! Wire models for the TestIO device catalog and customer APIs.

use serde::{Deserialize, Serialize};

use crate::error::TriggerError;

/// A resolved catalog entry as it appears in a device requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Provider identifier; always positive.
    pub id: u64,
    /// Display name reported by the provider.
    pub name: String,
}

/// Device category (`smartphones`, `tablets`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    /// Provider identifier.
    pub id: u64,
    /// Short canonical key, e.g. `smartphone`.
    pub key: String,
    /// Display name, e.g. `Smartphones`.
    pub name: String,
}

/// Operating system within a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatingSystem {
    /// Provider identifier.
    pub id: u64,
    /// Short canonical key, e.g. `ios`.
    pub key: String,
    /// Display name, e.g. `iOS`.
    pub name: String,
}

/// A released operating system version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatingSystemVersion {
    /// Provider identifier.
    pub id: u64,
    /// Version label, e.g. `15.1`.
    pub name: String,
}

/// Offset pagination block returned with version listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// Number of versions across all pages.
    pub total: u64,
    /// Page size.
    pub limit: u64,
    /// Offset of the first item on this page.
    pub offset: u64,
}

/// One page of operating system versions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionPage {
    /// Versions on this page.
    pub operating_system_versions: Vec<OperatingSystemVersion>,
    /// Position of this page in the full listing.
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
pub(super) struct CategoriesResponse {
    pub(super) categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OperatingSystemsResponse {
    pub(super) operating_systems: Vec<OperatingSystem>,
}

/// Test created by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedTest {
    /// Identifier of the new exploratory test.
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateTestResponse {
    pub(super) exploratory_test: CreatedTest,
}

/// Entries that can be matched against a maintainer-supplied name.
pub(crate) trait CatalogItem {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
    fn key(&self) -> Option<&str>;

    /// Case-insensitive match against the key or the display name.
    fn matches(&self, wanted_lowercase: &str) -> bool {
        self.id() > 0
            && (self.name().to_lowercase() == wanted_lowercase
                || self
                    .key()
                    .is_some_and(|key| key.to_lowercase() == wanted_lowercase))
    }

    fn entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.id(),
            name: self.name().to_owned(),
        }
    }
}

impl CatalogItem for Category {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }
}

impl CatalogItem for OperatingSystem {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }
}

impl CatalogItem for OperatingSystemVersion {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> Option<&str> {
        None
    }
}

/// TestIO product identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductId(String);

impl ProductId {
    /// Validates that the product identifier is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] for a blank value.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TriggerError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TriggerError::Configuration {
                message: "TestIO product id is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Bearer token for the TestIO API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] for a blank token.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TriggerError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TriggerError::Configuration {
                message: "TestIO token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("ApiToken(***)")
    }
}
