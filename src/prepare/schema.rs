//! JSON Schema validation for prepare requests.
//!
//! A failed validation is a normal outcome ([`ValidationOutcome::Invalid`]),
//! reported back to the maintainer verbatim. Only a schema that cannot be
//! loaded or compiled is an error.

use std::fmt::Write as _;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::TriggerError;

use super::model::PrepareRequest;

const EMBEDDED_SCHEMA: &str = include_str!("../../resources/prepare_schema.json");

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the instance (`/` for the root object).
    pub path: String,
    /// Schema keyword that failed (`required`, `type`, ...).
    pub keyword: String,
    /// Human-readable expectation.
    pub message: String,
}

/// Result of validating an object against the prepare schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The object conforms.
    Valid,
    /// The object violates the schema; violations keep validator order.
    Invalid(Vec<SchemaViolation>),
}

impl ValidationOutcome {
    /// Returns true when the object conformed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Formats one `<path>: <message> (<keyword>)` line per violation.
    #[must_use]
    pub fn diagnostics(&self) -> String {
        let Self::Invalid(violations) = self else {
            return String::new();
        };

        let mut output = String::new();
        for violation in violations {
            if !output.is_empty() {
                output.push('\n');
            }
            // Writing into a String cannot fail.
            let _written = write!(
                output,
                "{}: {} ({})",
                violation.path, violation.message, violation.keyword
            );
        }
        output
    }
}

/// Compiled prepare schema.
pub struct PrepareSchema {
    compiled: JSONSchema,
}

impl std::fmt::Debug for PrepareSchema {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("PrepareSchema").finish_non_exhaustive()
    }
}

impl PrepareSchema {
    /// Compiles the schema shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Schema`] if the embedded schema fails to
    /// compile.
    pub fn embedded() -> Result<Self, TriggerError> {
        Self::from_json_str(EMBEDDED_SCHEMA)
    }

    /// Loads and compiles a schema file, overriding the embedded one.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Schema`] when the file cannot be read, is not
    /// JSON, or is not a valid JSON Schema.
    pub fn from_file(path: &Utf8Path) -> Result<Self, TriggerError> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().ok_or_else(|| TriggerError::Schema {
            message: format!("schema path '{path}' has no file name"),
        })?;

        let raw = Dir::open_ambient_dir(parent, ambient_authority())
            .and_then(|dir| dir.read_to_string(file_name))
            .map_err(|error| TriggerError::Schema {
                message: format!("failed to read schema '{path}': {error}"),
            })?;

        Self::from_json_str(&raw)
    }

    /// Compiles a schema from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Schema`] for malformed JSON or an invalid
    /// schema document.
    pub fn from_json_str(raw: &str) -> Result<Self, TriggerError> {
        let schema: Value = serde_json::from_str(raw).map_err(|error| TriggerError::Schema {
            message: format!("schema is not valid JSON: {error}"),
        })?;
        Self::from_value(&schema)
    }

    /// Compiles a schema from an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Schema`] when compilation fails.
    pub fn from_value(schema: &Value) -> Result<Self, TriggerError> {
        let compiled = JSONSchema::compile(schema).map_err(|error| TriggerError::Schema {
            message: format!("schema failed to compile: {error}"),
        })?;
        Ok(Self { compiled })
    }

    /// Validates `instance` without side effects.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationOutcome {
        match self.compiled.validate(instance) {
            Ok(()) => ValidationOutcome::Valid,
            Err(errors) => ValidationOutcome::Invalid(
                errors
                    .map(|error| {
                        let path = error.instance_path.to_string();
                        let schema_path = error.schema_path.to_string();
                        SchemaViolation {
                            path: if path.is_empty() { "/".to_owned() } else { path },
                            keyword: schema_path
                                .rsplit('/')
                                .next()
                                .unwrap_or_default()
                                .to_owned(),
                            message: error.to_string(),
                        }
                    })
                    .collect(),
            ),
        }
    }

    /// Validates `value` and converts it into a [`PrepareRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::SchemaViolation`] with the formatted
    /// diagnostics when validation fails, or
    /// [`TriggerError::MalformedJson`] if the schema accepted a shape the
    /// request model cannot represent.
    pub fn parse_prepare(&self, value: Value) -> Result<PrepareRequest, TriggerError> {
        let outcome = self.validate(&value);
        if !outcome.is_valid() {
            return Err(TriggerError::SchemaViolation {
                diagnostics: outcome.diagnostics(),
            });
        }

        serde_json::from_value(value).map_err(|error| TriggerError::MalformedJson {
            message: error.to_string(),
        })
    }
}
