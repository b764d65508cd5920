//! Data models for the GitHub responses the trigger reads.

use serde::Deserialize;

/// Comment created by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    /// Comment identifier.
    pub id: u64,
    /// HTML URL for linking back to the comment.
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiComment {
    pub(super) id: u64,
    pub(super) body: Option<String>,
    pub(super) html_url: Option<String>,
}

impl From<ApiComment> for PostedComment {
    fn from(value: ApiComment) -> Self {
        Self {
            id: value.id,
            html_url: value.html_url,
        }
    }
}
