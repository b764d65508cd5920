//! Resolution of human device specs into catalog identifiers.
//!
//! Each lookup lists the relevant catalog level and picks the first entry
//! whose key or display name equals the wanted value, ignoring case. Version
//! listings are paginated and walked page by page.

use tracing::{debug, warn};

use crate::error::{DeviceField, TriggerError};
use crate::payload::DeviceRequirement;
use crate::prepare::DeviceSpec;

use super::gateway::DeviceCatalog;
use super::models::{CatalogEntry, CatalogItem, Pagination};

/// Resolves device specs against a [`DeviceCatalog`].
#[derive(Debug)]
pub struct DeviceResolver<'a, C: DeviceCatalog> {
    catalog: &'a C,
}

impl<'a, C: DeviceCatalog> DeviceResolver<'a, C> {
    /// Creates a resolver backed by `catalog`.
    #[must_use]
    pub const fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Finds the category whose key or name matches `name`.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures; an unknown name is `Ok(None)`.
    pub async fn resolve_category(&self, name: &str) -> Result<Option<CatalogEntry>, TriggerError> {
        let categories = self.catalog.categories().await?;
        Ok(first_match(&categories, name))
    }

    /// Finds the operating system within `category_id` matching `name`.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures; an unknown name is `Ok(None)`.
    pub async fn resolve_operating_system(
        &self,
        category_id: u64,
        name: &str,
    ) -> Result<Option<CatalogEntry>, TriggerError> {
        let systems = self.catalog.operating_systems(category_id).await?;
        Ok(first_match(&systems, name))
    }

    /// Finds the version of `operating_system_id` named `version`.
    ///
    /// Pages are requested until a match is found or the listing is
    /// exhausted. The walk stops early when the provider reports a zero page
    /// size or an offset that does not advance, and never requests more than
    /// `ceil(total / limit) + 1` pages.
    ///
    /// # Errors
    ///
    /// Propagates catalog failures; an unknown version is `Ok(None)`.
    pub async fn resolve_version(
        &self,
        operating_system_id: u64,
        version: &str,
    ) -> Result<Option<CatalogEntry>, TriggerError> {
        let mut offset = 0;
        let mut remaining_pages: Option<u64> = None;

        loop {
            let page = self
                .catalog
                .operating_system_versions(operating_system_id, offset)
                .await?;
            debug!(
                operating_system_id,
                offset = page.pagination.offset,
                total = page.pagination.total,
                "scanning version page"
            );

            if let Some(found) = first_match(&page.operating_system_versions, version) {
                return Ok(Some(found));
            }

            let budget = remaining_pages.get_or_insert_with(|| page_budget(page.pagination));
            *budget = budget.saturating_sub(1);

            match next_offset(page.pagination, offset) {
                Some(next) if *budget > 0 => offset = next,
                Some(_) => {
                    warn!(
                        operating_system_id,
                        "version listing exceeded its page budget; stopping"
                    );
                    return Ok(None);
                }
                None => return Ok(None),
            }
        }
    }

    /// Resolves a full device spec into a [`DeviceRequirement`].
    ///
    /// Lookups run in order: category, operating system, minimum version,
    /// then the maximum version when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::InvalidDevice`] naming the first field that
    /// did not resolve, or the catalog failure that interrupted resolution.
    pub async fn resolve(&self, spec: &DeviceSpec) -> Result<DeviceRequirement, TriggerError> {
        let category = self
            .resolve_category(&spec.category)
            .await?
            .ok_or_else(|| invalid(DeviceField::Category, &spec.category))?;

        let operating_system = self
            .resolve_operating_system(category.id, &spec.os)
            .await?
            .ok_or_else(|| invalid(DeviceField::OperatingSystem, &spec.os))?;

        let min_operating_system_version = self
            .resolve_version(operating_system.id, &spec.min)
            .await?
            .ok_or_else(|| invalid(DeviceField::MinVersion, &spec.min))?;

        let max_operating_system_version = match spec.max.as_deref() {
            Some(max) => Some(
                self.resolve_version(operating_system.id, max)
                    .await?
                    .ok_or_else(|| invalid(DeviceField::MaxVersion, max))?,
            ),
            None => None,
        };

        Ok(DeviceRequirement {
            category,
            operating_system,
            min_operating_system_version,
            max_operating_system_version,
        })
    }
}

fn first_match<T: CatalogItem>(items: &[T], wanted: &str) -> Option<CatalogEntry> {
    let wanted_lowercase = wanted.to_lowercase();
    items
        .iter()
        .find(|item| item.matches(&wanted_lowercase))
        .map(CatalogItem::entry)
}

fn invalid(field: DeviceField, value: &str) -> TriggerError {
    TriggerError::InvalidDevice {
        field,
        value: value.to_owned(),
    }
}

/// Maximum number of page requests for a listing, first page included.
const fn page_budget(pagination: Pagination) -> u64 {
    if pagination.limit == 0 {
        return 1;
    }
    pagination.total.div_ceil(pagination.limit).saturating_add(1)
}

/// Offset of the following page, or `None` once the listing is exhausted.
const fn next_offset(pagination: Pagination, requested: u64) -> Option<u64> {
    if pagination.limit == 0 {
        return None;
    }
    let next = pagination.offset.saturating_add(pagination.limit);
    if next >= pagination.total || next <= requested {
        return None;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};
    use rstest::{fixture, rstest};

    use super::DeviceResolver;
    use crate::error::{DeviceField, TriggerError};
    use crate::prepare::DeviceSpec;
    use crate::testio::gateway::MockDeviceCatalog;
    use crate::testio::models::{
        CatalogEntry, Category, OperatingSystem, OperatingSystemVersion, Pagination, VersionPage,
    };

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 0,
                key: "smartphone".to_owned(),
                name: "Placeholder".to_owned(),
            },
            Category {
                id: 2,
                key: "smartphone".to_owned(),
                name: "Smartphones".to_owned(),
            },
            Category {
                id: 6,
                key: "tablet".to_owned(),
                name: "Tablets".to_owned(),
            },
        ]
    }

    fn systems() -> Vec<OperatingSystem> {
        vec![
            OperatingSystem {
                id: 1,
                key: "ios".to_owned(),
                name: "iOS".to_owned(),
            },
            OperatingSystem {
                id: 3,
                key: "android".to_owned(),
                name: "Android".to_owned(),
            },
        ]
    }

    fn version(id: u64, name: &str) -> OperatingSystemVersion {
        OperatingSystemVersion {
            id,
            name: name.to_owned(),
        }
    }

    fn page(versions: Vec<OperatingSystemVersion>, total: u64, limit: u64, offset: u64) -> VersionPage {
        VersionPage {
            operating_system_versions: versions,
            pagination: Pagination {
                total,
                limit,
                offset,
            },
        }
    }

    #[fixture]
    fn spec() -> DeviceSpec {
        DeviceSpec {
            os: "iOS".to_owned(),
            category: "smartphones".to_owned(),
            min: "10.1".to_owned(),
            max: Some("15".to_owned()),
        }
    }

    #[rstest]
    #[case::by_name("Smartphones")]
    #[case::by_name_lowercase("smartphones")]
    #[case::by_key("SMARTPHONE")]
    #[tokio::test]
    async fn category_matches_key_or_name_ignoring_case(#[case] wanted: &str) {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_categories()
            .returning(|| Ok(categories()));

        let found = DeviceResolver::new(&catalog)
            .resolve_category(wanted)
            .await
            .expect("lookup should succeed");

        assert_eq!(
            found,
            Some(CatalogEntry {
                id: 2,
                name: "Smartphones".to_owned()
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_category_is_none() {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_categories()
            .returning(|| Ok(categories()));

        let found = DeviceResolver::new(&catalog)
            .resolve_category("phablet")
            .await
            .expect("lookup should succeed");

        assert_eq!(found, None);
    }

    #[rstest]
    #[tokio::test]
    async fn growing_total_stops_at_page_budget() {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_operating_system_versions()
            .with(eq(1), always())
            .times(3)
            .returning(|_, offset| {
                Ok(page(
                    vec![version(offset + 100, "1.0")],
                    offset + 11,
                    10,
                    offset,
                ))
            });

        let found = DeviceResolver::new(&catalog)
            .resolve_version(1, "99.9")
            .await
            .expect("lookup should succeed");

        assert_eq!(found, None);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_operating_system_names_the_os(mut spec: DeviceSpec) {
        spec.os = "fooOS".to_owned();
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_categories()
            .times(1)
            .returning(|| Ok(categories()));
        catalog
            .expect_operating_systems()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(systems()));
        catalog.expect_operating_system_versions().never();

        let error = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect_err("unknown OS should fail");

        assert_eq!(
            error,
            TriggerError::InvalidDevice {
                field: DeviceField::OperatingSystem,
                value: "fooOS".to_owned(),
            }
        );
        assert_eq!(error.to_string(), "OS name 'fooOS' is not valid");
    }

    #[rstest]
    #[tokio::test]
    async fn version_on_second_page_is_found() {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_operating_system_versions()
            .with(eq(1), eq(0))
            .times(1)
            .returning(|_, _| {
                Ok(page(
                    (1..=10).map(|id| version(id, &format!("9.{id}"))).collect(),
                    25,
                    10,
                    0,
                ))
            });
        catalog
            .expect_operating_system_versions()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Ok(page(vec![version(42, "15.1")], 25, 10, 10)));

        let found = DeviceResolver::new(&catalog)
            .resolve_version(1, "15.1")
            .await
            .expect("lookup should succeed");

        assert_eq!(
            found,
            Some(CatalogEntry {
                id: 42,
                name: "15.1".to_owned()
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn missing_version_walks_every_page_once() {
        let mut catalog = MockDeviceCatalog::new();
        for offset in [0, 10, 20] {
            catalog
                .expect_operating_system_versions()
                .with(eq(1), eq(offset))
                .times(1)
                .returning(move |_, _| Ok(page(vec![version(offset + 1, "1.0")], 25, 10, offset)));
        }

        let found = DeviceResolver::new(&catalog)
            .resolve_version(1, "99")
            .await
            .expect("lookup should succeed");

        assert_eq!(found, None);
    }

    #[rstest]
    #[tokio::test]
    async fn non_advancing_offset_stops_the_walk() {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_operating_system_versions()
            .with(eq(1), eq(0))
            .times(1)
            .returning(|_, _| Ok(page(vec![version(5, "1.0")], 25, 10, 0)));
        catalog
            .expect_operating_system_versions()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Ok(page(vec![version(6, "1.1")], 25, 10, 0)));

        let found = DeviceResolver::new(&catalog)
            .resolve_version(1, "99")
            .await
            .expect("lookup should succeed");

        assert_eq!(found, None);
    }

    #[rstest]
    #[tokio::test]
    async fn zero_limit_stops_after_first_page() {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_operating_system_versions()
            .times(1)
            .returning(|_, _| Ok(page(vec![], 25, 0, 0)));

        let found = DeviceResolver::new(&catalog)
            .resolve_version(1, "15")
            .await
            .expect("lookup should succeed");

        assert_eq!(found, None);
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_full_spec(spec: DeviceSpec) {
        let mut catalog = MockDeviceCatalog::new();
        catalog
            .expect_categories()
            .times(1)
            .returning(|| Ok(categories()));
        catalog
            .expect_operating_systems()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(systems()));
        catalog
            .expect_operating_system_versions()
            .with(eq(1), eq(0))
            .times(2)
            .returning(|_, _| {
                Ok(page(
                    vec![version(11, "10.1"), version(12, "15")],
                    2,
                    10,
                    0,
                ))
            });

        let requirement = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect("spec should resolve");

        assert_eq!(requirement.category.id, 2);
        assert_eq!(requirement.operating_system.id, 1);
        assert_eq!(requirement.min_operating_system_version.id, 11);
        assert_eq!(
            requirement.max_operating_system_version.map(|entry| entry.id),
            Some(12)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn absent_max_skips_second_version_lookup(mut spec: DeviceSpec) {
        spec.max = None;
        let mut catalog = MockDeviceCatalog::new();
        catalog.expect_categories().returning(|| Ok(categories()));
        catalog.expect_operating_systems().returning(|_| Ok(systems()));
        catalog
            .expect_operating_system_versions()
            .times(1)
            .returning(|_, _| Ok(page(vec![version(11, "10.1")], 1, 10, 0)));

        let requirement = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect("spec should resolve");

        assert_eq!(requirement.max_operating_system_version, None);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_category_stops_before_os_lookup(mut spec: DeviceSpec) {
        spec.category = "phablet".to_owned();
        let mut catalog = MockDeviceCatalog::new();
        catalog.expect_categories().returning(|| Ok(categories()));
        catalog.expect_operating_systems().never();
        catalog.expect_operating_system_versions().never();

        let error = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect_err("unknown category should fail");

        assert_eq!(error.to_string(), "Category 'phablet' is not valid");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_max_version_names_the_field(spec: DeviceSpec) {
        let mut catalog = MockDeviceCatalog::new();
        catalog.expect_categories().returning(|| Ok(categories()));
        catalog.expect_operating_systems().returning(|_| Ok(systems()));
        catalog
            .expect_operating_system_versions()
            .returning(|_, _| Ok(page(vec![version(11, "10.1")], 1, 10, 0)));

        let error = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect_err("unknown max version should fail");

        assert_eq!(
            error,
            TriggerError::InvalidDevice {
                field: DeviceField::MaxVersion,
                value: "15".to_owned()
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn catalog_failure_is_not_treated_as_missing(spec: DeviceSpec) {
        let mut catalog = MockDeviceCatalog::new();
        catalog.expect_categories().returning(|| {
            Err(TriggerError::Network {
                message: "connection refused".to_owned(),
            })
        });

        let error = DeviceResolver::new(&catalog)
            .resolve(&spec)
            .await
            .expect_err("transport failure should propagate");

        assert!(matches!(error, TriggerError::Network { .. }), "{error:?}");
    }
}
