//! Gateway for reading and posting pull request comments through Octocrab.
//!
//! The trait keeps the pipeline testable with mocks while the Octocrab
//! implementation performs the real HTTP requests.

mod client;
mod comments;
mod error_mapping;

pub use comments::OctocrabCommentGateway;

use async_trait::async_trait;

use crate::error::TriggerError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::PostedComment;

/// Public GitHub API endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Gateway for the pull request conversation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentGateway: Send + Sync {
    /// Post a new comment on the pull request.
    async fn create_comment(
        &self,
        locator: &PullRequestLocator,
        body: &str,
    ) -> Result<PostedComment, TriggerError>;

    /// Fetch the body of an issue comment; `None` when GitHub reports none.
    async fn comment_body(
        &self,
        locator: &PullRequestLocator,
        comment_id: u64,
    ) -> Result<Option<String>, TriggerError>;

    /// Fetch the pull request title.
    async fn pull_request_title(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<String, TriggerError>;
}
