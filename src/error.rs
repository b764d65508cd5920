//! Error types shared by every stage of the trigger pipeline.

use thiserror::Error;

/// Broad classification of a [`TriggerError`].
///
/// The classification decides how the failure is presented to the
/// maintainer and whether a caller may try again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The comment carried no usable JSON block.
    Parse,
    /// The JSON block did not conform to the prepare schema.
    Validation,
    /// The device spec named an unknown category, OS, or version.
    Resolution,
    /// GitHub or the provider rejected a request or could not be reached.
    Upstream,
    /// The action was invoked without the context it needs.
    Configuration,
    /// Local file handling failed.
    Io,
}

/// Errors surfaced while triggering an exploratory test.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriggerError {
    /// The comment contained no ```` ```json ```` fenced block.
    #[error("Provided comment didn't contain a ```json block")]
    NoFencedBlock,

    /// The fenced block was present but blank.
    #[error("Provided input seems to be empty between ```json and ```")]
    EmptyFencedBlock,

    /// The fenced block did not hold valid JSON.
    #[error("Provided json could not be parsed: {message}")]
    MalformedJson {
        /// Parser diagnostic from `serde_json`.
        message: String,
    },

    /// The submit comment had no body at all.
    #[error("Comment {reference} seems to be empty")]
    EmptyComment {
        /// URL or identifier of the offending comment.
        reference: String,
    },

    /// The parsed object failed schema validation.
    #[error("Provided json is not conform to schema:\n{diagnostics}")]
    SchemaViolation {
        /// One line per violation, `<path>: <message> (<keyword>)`.
        diagnostics: String,
    },

    /// The prepare schema itself could not be loaded or compiled.
    #[error("prepare schema is unusable: {message}")]
    Schema {
        /// Details about the schema failure.
        message: String,
    },

    /// A device spec field did not match any catalog entry.
    #[error("{field} '{value}' is not valid")]
    InvalidDevice {
        /// Human label of the field (`Category`, `OS name`, ...).
        field: DeviceField,
        /// The value the maintainer supplied.
        value: String,
    },

    /// GitHub or the provider returned a failure response.
    #[error("{message}")]
    Upstream {
        /// HTTP status of the failed response, when there was one.
        status: Option<u16>,
        /// Message returned by the remote service.
        message: String,
    },

    /// GitHub rejected the token.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// Networking failed while calling a remote service.
    #[error("network error: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Configuration is missing or inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

/// Device spec fields named in resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceField {
    /// Device category (`smartphones`, `tablets`, ...).
    Category,
    /// Operating system name.
    OperatingSystem,
    /// Lowest operating system version.
    MinVersion,
    /// Highest operating system version.
    MaxVersion,
}

impl std::fmt::Display for DeviceField {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Category => "Category",
            Self::OperatingSystem => "OS name",
            Self::MinVersion => "Min version",
            Self::MaxVersion => "Max version",
        };
        formatter.write_str(label)
    }
}

impl TriggerError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFencedBlock
            | Self::EmptyFencedBlock
            | Self::MalformedJson { .. }
            | Self::EmptyComment { .. } => ErrorKind::Parse,
            Self::SchemaViolation { .. } => ErrorKind::Validation,
            Self::InvalidDevice { .. } => ErrorKind::Resolution,
            Self::Upstream { .. } | Self::Authentication { .. } | Self::Network { .. } => {
                ErrorKind::Upstream
            }
            Self::Configuration { .. } | Self::Schema { .. } => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether a caller could reasonably retry the failed operation.
    ///
    /// Transport failures and responses with status 429 or 5xx qualify. The
    /// pipeline never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Upstream {
                status: Some(code),
                ..
            } => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}
