//! Identity wrappers addressing a pull request on a GitHub host.

use url::Url;

use crate::error::TriggerError;

fn missing(what: &str) -> TriggerError {
    TriggerError::Configuration {
        message: format!("{what} is required"),
    }
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates a non-blank owner.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the owner is blank.
    pub fn new(value: &str) -> Result<Self, TriggerError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(missing("repository owner"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates a non-blank repository name.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the name is blank.
    pub fn new(value: &str) -> Result<Self, TriggerError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(missing("repository name"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates a positive pull request number.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] for zero.
    pub fn new(value: u64) -> Result<Self, TriggerError> {
        if value == 0 {
            return Err(TriggerError::Configuration {
                message: "pull request number must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, TriggerError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(missing("GitHub token"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Pull request coordinates plus the API base they live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Builds a locator from workflow-supplied coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the API base is not a
    /// URL.
    ///
    /// # Example
    ///
    /// ```
    /// use testio_trigger::github::{
    ///     PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
    /// };
    ///
    /// let locator = PullRequestLocator::new(
    ///     RepositoryOwner::new("octo").expect("owner"),
    ///     RepositoryName::new("app").expect("repo"),
    ///     PullRequestNumber::new(7).expect("number"),
    ///     "https://api.github.com",
    /// )
    /// .expect("locator should build");
    /// assert_eq!(locator.number().get(), 7);
    /// ```
    pub fn new(
        owner: RepositoryOwner,
        repository: RepositoryName,
        number: PullRequestNumber,
        api_base: &str,
    ) -> Result<Self, TriggerError> {
        let api_base = Url::parse(api_base).map_err(|error| TriggerError::Configuration {
            message: format!("GitHub API URL '{api_base}' is invalid: {error}"),
        })?;
        Ok(Self {
            api_base,
            owner,
            repository,
            number,
        })
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn comments_path(&self) -> String {
        format!(
            "/repos/{}/{}/issues/{}/comments",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }

    pub(crate) fn comment_path(&self, comment_id: u64) -> String {
        format!(
            "/repos/{}/{}/issues/comments/{comment_id}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}
