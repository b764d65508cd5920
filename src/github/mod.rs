//! GitHub pull request comment access.
//!
//! This module wraps Octocrab to read the maintainer's submit comment, read
//! the pull request title, and post the bot's replies. Octocrab failures are
//! mapped into [`TriggerError`](crate::TriggerError) variants so that callers
//! never see Octocrab internals.

pub mod gateway;
pub mod locator;
pub mod models;

pub use gateway::{CommentGateway, DEFAULT_GITHUB_API_URL, OctocrabCommentGateway};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::PostedComment;

#[cfg(test)]
pub use gateway::MockCommentGateway;
