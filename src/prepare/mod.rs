//! Maintainer-facing prepare request handling.
//!
//! This module turns comment text into a validated [`PrepareRequest`]:
//! [`extract_json`] locates the fenced JSON block and [`PrepareSchema`]
//! validates it. [`render_prepare_comment`] produces the pre-filled comment
//! the maintainer starts from.

mod extract;
mod model;
mod schema;
mod template;

pub use extract::{extract_create_comment_url, extract_json};
pub use model::{DeviceSpec, Feature, PrepareRequest, TestEnvironment};
pub use schema::{PrepareSchema, SchemaViolation, ValidationOutcome};
pub use template::{CREATE_COMMAND, DEVICE_DEFAULTS, DeviceDefaults, render_prepare_comment};

pub(crate) use template::render;
