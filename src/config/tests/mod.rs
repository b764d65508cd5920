//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Action, token, and output file resolution tests
//! - `context_building`: Pipeline context construction tests
//! - `timeout_loading`: `request_timeout_seconds` loading tests

mod helpers;
