//! Trigger TestIO exploratory tests from GitHub pull request comments.
//!
//! A maintainer requests a test with a create command, receives a
//! pre-filled prepare comment, edits it, and submits it back. The crate
//! extracts and validates the submitted JSON, resolves the device spec
//! against the TestIO catalog, persists the resulting payload, and submits
//! it as an exploratory test. Failures are recorded so that a later step
//! can report them in the pull request.

pub mod config;
pub mod error;
pub mod github;
pub mod outputs;
pub mod payload;
pub mod pipeline;
pub mod prepare;
pub mod testio;
pub mod workspace;

pub use config::TriggerConfig;
pub use error::{DeviceField, ErrorKind, TriggerError};
pub use github::{
    CommentGateway, OctocrabCommentGateway, PersonalAccessToken, PostedComment,
    PullRequestLocator,
};
pub use outputs::{GithubOutputFileSink, LogOutputSink, OutputSink, StepOutput};
pub use payload::{TestPayload, build_payload};
pub use pipeline::{
    Action, GithubContext, Pipeline, PipelineContext, PipelineRun, PipelineStage,
    ProviderContext, RunState,
};
pub use prepare::{PrepareRequest, PrepareSchema};
pub use testio::{
    ApiToken, DeviceCatalog, DeviceCatalogClient, DeviceResolver, ExploratoryTestClient,
    ExploratoryTestGateway, ProductId,
};
pub use workspace::Workspace;
