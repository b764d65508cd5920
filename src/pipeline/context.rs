//! Explicit inputs for the pipeline actions.
//!
//! Actions that talk to GitHub need the pull request coordinates, actions
//! that talk to TestIO need product credentials. A run carries whichever
//! halves the invocation was configured with.

use crate::error::TriggerError;
use crate::github::PullRequestLocator;
use crate::testio::{ApiToken, ProductId};

/// GitHub side of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubContext {
    /// Pull request the comments belong to.
    pub locator: PullRequestLocator,
    /// Id of the submit comment, for `create-payload`.
    pub comment_id: Option<u64>,
    /// Body of the triggering create comment, for `add-prepare-comment`.
    pub comment_body: Option<String>,
    /// URL of the create comment that started the conversation.
    pub create_comment_url: Option<String>,
}

impl GithubContext {
    /// Creates a context with only the pull request coordinates.
    #[must_use]
    pub const fn new(locator: PullRequestLocator) -> Self {
        Self {
            locator,
            comment_id: None,
            comment_body: None,
            create_comment_url: None,
        }
    }

    /// The submit comment id.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when no id was supplied.
    pub fn require_comment_id(&self) -> Result<u64, TriggerError> {
        self.comment_id.ok_or_else(|| TriggerError::Configuration {
            message: "submit comment id is required".to_owned(),
        })
    }

    /// The create comment URL.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when no URL was supplied.
    pub fn require_create_comment_url(&self) -> Result<&str, TriggerError> {
        self.create_comment_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| TriggerError::Configuration {
                message: "create comment URL is required".to_owned(),
            })
    }
}

/// TestIO side of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContext {
    /// Product the test is created for.
    pub product_id: ProductId,
    /// Customer API token.
    pub token: ApiToken,
}

/// The collaborators an invocation may address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineContext {
    /// Only GitHub is configured.
    Github(GithubContext),
    /// Only TestIO is configured.
    Provider(ProviderContext),
    /// Both are configured.
    Both {
        /// GitHub half.
        github: GithubContext,
        /// TestIO half.
        provider: ProviderContext,
    },
}

impl PipelineContext {
    /// Combines optional halves into a context.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when neither half is present.
    pub fn from_parts(
        github: Option<GithubContext>,
        provider: Option<ProviderContext>,
    ) -> Result<Self, TriggerError> {
        match (github, provider) {
            (Some(github), Some(provider)) => Ok(Self::Both { github, provider }),
            (Some(github), None) => Ok(Self::Github(github)),
            (None, Some(provider)) => Ok(Self::Provider(provider)),
            (None, None) => Err(TriggerError::Configuration {
                message: "neither Github nor TestIO properties are configured".to_owned(),
            }),
        }
    }

    /// The GitHub half.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when GitHub is not configured.
    pub fn github(&self) -> Result<&GithubContext, TriggerError> {
        match self {
            Self::Github(github) | Self::Both { github, .. } => Ok(github),
            Self::Provider(_) => Err(TriggerError::Configuration {
                message: "Github properties are not configured".to_owned(),
            }),
        }
    }

    /// The TestIO half.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when TestIO is not configured.
    pub fn provider(&self) -> Result<&ProviderContext, TriggerError> {
        match self {
            Self::Provider(provider) | Self::Both { provider, .. } => Ok(provider),
            Self::Github(_) => Err(TriggerError::Configuration {
                message: "TestIO properties are not configured".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{GithubContext, PipelineContext, ProviderContext};
    use crate::error::TriggerError;
    use crate::github::{PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner};
    use crate::testio::{ApiToken, ProductId};

    #[fixture]
    fn github() -> GithubContext {
        GithubContext::new(
            PullRequestLocator::new(
                RepositoryOwner::new("octo").expect("owner"),
                RepositoryName::new("app").expect("repo"),
                PullRequestNumber::new(3).expect("number"),
                "https://api.github.com",
            )
            .expect("locator should build"),
        )
    }

    #[fixture]
    fn provider() -> ProviderContext {
        ProviderContext {
            product_id: ProductId::new("42").expect("product id"),
            token: ApiToken::new("secret").expect("token"),
        }
    }

    #[rstest]
    fn github_only_context_rejects_provider_access(github: GithubContext) {
        let context =
            PipelineContext::from_parts(Some(github), None).expect("context should build");

        assert!(context.github().is_ok());
        assert_eq!(
            context.provider(),
            Err(TriggerError::Configuration {
                message: "TestIO properties are not configured".to_owned()
            })
        );
    }

    #[rstest]
    fn provider_only_context_rejects_github_access(provider: ProviderContext) {
        let context =
            PipelineContext::from_parts(None, Some(provider)).expect("context should build");

        assert!(context.provider().is_ok());
        assert!(matches!(
            context.github(),
            Err(TriggerError::Configuration { .. })
        ));
    }

    #[rstest]
    fn both_halves_are_reachable(github: GithubContext, provider: ProviderContext) {
        let context = PipelineContext::from_parts(Some(github), Some(provider))
            .expect("context should build");

        assert!(matches!(context, PipelineContext::Both { .. }));
        assert!(context.github().is_ok());
        assert!(context.provider().is_ok());
    }

    #[rstest]
    fn empty_context_is_rejected() {
        assert!(PipelineContext::from_parts(None, None).is_err());
    }

    #[rstest]
    fn blank_create_comment_url_is_missing(mut github: GithubContext) {
        github.create_comment_url = Some("  ".to_owned());

        assert!(github.require_create_comment_url().is_err());
        assert!(github.require_comment_id().is_err());
    }
}
