//! Configuration loaded from CLI, environment, and files.
//!
//! [`TriggerConfig`] merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.testio-trigger.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables** – `TESTIO_ACTION`, `TESTIO_PRODUCT_ID`, ...
//!    plus the runner's `GITHUB_TOKEN` and `GITHUB_OUTPUT` as fallbacks
//! 4. **Command-line arguments** – `--action`/`-a`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! owner = "Staffbase"
//! repo = "testio-management"
//! product_id = "1234"
//! workspace_dir = ".github/testio"
//! request_timeout_seconds = 60
//! ```

use std::env;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::TriggerError;
use crate::github::{
    DEFAULT_GITHUB_API_URL, PersonalAccessToken, PullRequestLocator, PullRequestNumber,
    RepositoryName, RepositoryOwner,
};
use crate::pipeline::{Action, GithubContext, PipelineContext, ProviderContext};
use crate::prepare::PrepareSchema;
use crate::testio::{ApiToken, DEFAULT_CUSTOMER_API_URL, DEFAULT_DEVICES_API_URL, ProductId};
use crate::workspace::{DEFAULT_ERROR_FILE, Workspace};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for one invocation of the trigger.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use testio_trigger::TriggerConfig;
///
/// let config = TriggerConfig::load().expect("failed to load configuration");
/// let action = config.require_action().expect("action required");
/// let context = config.pipeline_context().expect("context required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "TESTIO",
    discovery(
        dotfile_name = ".testio-trigger.toml",
        config_file_name = "testio-trigger.toml",
        app_name = "testio-trigger"
    )
)]
pub struct TriggerConfig {
    /// Action to run: `add-prepare-comment`, `create-payload`,
    /// `trigger-test`, or `report-failure`.
    #[ortho_config(cli_short = 'a')]
    pub action: Option<String>,

    /// GitHub token; falls back to `GITHUB_TOKEN`.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository owner.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Pull request number.
    #[ortho_config(cli_short = 'p')]
    pub pr_number: Option<u64>,

    /// GitHub API base URL.
    #[ortho_config()]
    pub github_api_url: String,

    /// Id of the submit comment read by `create-payload`.
    #[ortho_config()]
    pub comment_id: Option<u64>,

    /// Body of the create comment answered by `add-prepare-comment`.
    #[ortho_config()]
    pub comment_body: Option<String>,

    /// URL of the create comment that started the conversation.
    #[ortho_config()]
    pub create_comment_url: Option<String>,

    /// TestIO customer API token.
    #[ortho_config()]
    pub testio_token: Option<String>,

    /// TestIO product id.
    #[ortho_config()]
    pub product_id: Option<String>,

    /// Device catalog base URL.
    #[ortho_config()]
    pub devices_api_url: String,

    /// Customer API base URL.
    #[ortho_config()]
    pub customer_api_url: String,

    /// Root below which the payload and error files are kept.
    #[ortho_config(cli_short = 'w')]
    pub workspace_dir: String,

    /// Error message file name, relative to `workspace_dir`.
    #[ortho_config()]
    pub error_file: String,

    /// Prepare schema file replacing the embedded schema.
    #[ortho_config()]
    pub schema_path: Option<String>,

    /// Timeout applied to every HTTP request, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Step output file; falls back to `GITHUB_OUTPUT`.
    #[ortho_config()]
    pub github_output: Option<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            action: None,
            token: None,
            owner: None,
            repo: None,
            pr_number: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_owned(),
            comment_id: None,
            comment_body: None,
            create_comment_url: None,
            testio_token: None,
            product_id: None,
            devices_api_url: DEFAULT_DEVICES_API_URL.to_owned(),
            customer_api_url: DEFAULT_CUSTOMER_API_URL.to_owned(),
            workspace_dir: ".".to_owned(),
            error_file: DEFAULT_ERROR_FILE.to_owned(),
            schema_path: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            github_output: None,
        }
    }
}

impl TriggerConfig {
    /// Parses the configured action.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the action is missing or
    /// unknown.
    pub fn require_action(&self) -> Result<Action, TriggerError> {
        let raw = self
            .action
            .as_deref()
            .ok_or_else(|| TriggerError::Configuration {
                message: "action is required (use --action or -a)".to_owned(),
            })?;
        Action::from_str(raw.trim(), true).map_err(|_| TriggerError::Configuration {
            message: format!(
                "unknown action '{raw}'; expected add-prepare-comment, create-payload, \
                 trigger-test, or report-failure"
            ),
        })
    }

    /// Resolves the GitHub token, falling back to `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when no source provides a
    /// token.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, TriggerError> {
        let token = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .unwrap_or_default();
        PersonalAccessToken::new(token)
    }

    /// Resolves the step output file, falling back to `GITHUB_OUTPUT`.
    #[must_use]
    pub fn resolve_github_output(&self) -> Option<Utf8PathBuf> {
        self.github_output
            .clone()
            .or_else(|| env::var("GITHUB_OUTPUT").ok())
            .filter(|path| !path.trim().is_empty())
            .map(Utf8PathBuf::from)
    }

    /// Builds the GitHub half of the context when owner, repo, and pull
    /// request number are all set.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the coordinates are
    /// only partially set or invalid.
    pub fn github_context(&self) -> Result<Option<GithubContext>, TriggerError> {
        let (owner, repo, number) = match (&self.owner, &self.repo, self.pr_number) {
            (None, None, None) => return Ok(None),
            (Some(owner), Some(repo), Some(number)) => (owner, repo, number),
            _ => {
                return Err(TriggerError::Configuration {
                    message: "owner, repo, and pr_number must be set together".to_owned(),
                });
            }
        };

        let locator = PullRequestLocator::new(
            RepositoryOwner::new(owner)?,
            RepositoryName::new(repo)?,
            PullRequestNumber::new(number)?,
            &self.github_api_url,
        )?;
        Ok(Some(GithubContext {
            locator,
            comment_id: self.comment_id,
            comment_body: self.comment_body.clone(),
            create_comment_url: self.create_comment_url.clone(),
        }))
    }

    /// Builds the TestIO half of the context when the product id and token
    /// are both set.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when only one of them is set
    /// or either is blank.
    pub fn provider_context(&self) -> Result<Option<ProviderContext>, TriggerError> {
        match (&self.product_id, &self.testio_token) {
            (None, None) => Ok(None),
            (Some(product_id), Some(token)) => Ok(Some(ProviderContext {
                product_id: ProductId::new(product_id)?,
                token: ApiToken::new(token)?,
            })),
            _ => Err(TriggerError::Configuration {
                message: "product_id and testio_token must be set together".to_owned(),
            }),
        }
    }

    /// Builds the tagged context from whichever halves are configured.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when a half is inconsistent
    /// or neither is configured.
    pub fn pipeline_context(&self) -> Result<PipelineContext, TriggerError> {
        PipelineContext::from_parts(self.github_context()?, self.provider_context()?)
    }

    /// Workspace holding the payload and error files.
    #[must_use]
    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.workspace_dir.as_str(), self.error_file.as_str())
    }

    /// Timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Loads the configured schema, or the embedded one.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Schema`] when the schema cannot be loaded or
    /// compiled.
    pub fn load_schema(&self) -> Result<PrepareSchema, TriggerError> {
        self.schema_path
            .as_deref()
            .map_or_else(PrepareSchema::embedded, |path| {
                PrepareSchema::from_file(Utf8Path::new(path))
            })
    }
}

#[cfg(test)]
mod tests;
