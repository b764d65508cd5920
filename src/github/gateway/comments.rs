//! Octocrab implementation of the comment gateway.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::debug;

use crate::error::TriggerError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{ApiComment, ApiPullRequest, PostedComment};

use super::CommentGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Octocrab-backed comment gateway.
pub struct OctocrabCommentGateway {
    client: Octocrab,
}

impl OctocrabCommentGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the base URI cannot be
    /// parsed or the client cannot be constructed.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, TriggerError> {
        build_octocrab_client(token, api_base).map(Self::new)
    }
}

#[async_trait]
impl CommentGateway for OctocrabCommentGateway {
    async fn create_comment(
        &self,
        locator: &PullRequestLocator,
        body: &str,
    ) -> Result<PostedComment, TriggerError> {
        debug!(path = %locator.comments_path(), "posting pull request comment");
        let comment: ApiComment = self
            .client
            .post(locator.comments_path(), Some(&json!({ "body": body })))
            .await
            .map_err(|error| map_octocrab_error("create comment", &error))?;
        Ok(comment.into())
    }

    async fn comment_body(
        &self,
        locator: &PullRequestLocator,
        comment_id: u64,
    ) -> Result<Option<String>, TriggerError> {
        self.client
            .get::<ApiComment, _, _>(locator.comment_path(comment_id), None::<&()>)
            .await
            .map(|comment| comment.body)
            .map_err(|error| map_octocrab_error("issue comment", &error))
    }

    async fn pull_request_title(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<String, TriggerError> {
        self.client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
            .map(|pull_request| pull_request.title.unwrap_or_default())
            .map_err(|error| map_octocrab_error("pull request", &error))
    }
}
