//! TestIO provider integration.
//!
//! The device catalog and exploratory test submission sit behind the
//! [`DeviceCatalog`] and [`ExploratoryTestGateway`] traits. The
//! [`DeviceResolver`] turns a maintainer's device spec into catalog ids.

pub mod gateway;
pub mod models;
mod resolver;

pub use gateway::{
    DEFAULT_CUSTOMER_API_URL, DEFAULT_DEVICES_API_URL, DeviceCatalog, DeviceCatalogClient,
    ExploratoryTestClient, ExploratoryTestGateway,
};
pub use models::{
    ApiToken, CatalogEntry, Category, CreatedTest, OperatingSystem, OperatingSystemVersion,
    Pagination, ProductId, VersionPage,
};
pub use resolver::DeviceResolver;
