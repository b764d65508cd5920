//! Orchestration of the four workflow actions.
//!
//! Each action runs as its own process. `create-payload` and `trigger-test`
//! hand over through the payload file in the [`Workspace`]; any failing
//! action records its message in the error file so that `report-failure`
//! can post it to the pull request.

mod context;
mod report;
mod run;

pub use context::{GithubContext, PipelineContext, ProviderContext};
pub use report::render_failure_comment;
pub use run::{PipelineRun, PipelineStage, RunState};

use tracing::{debug, error, info, warn};

use crate::error::TriggerError;
use crate::github::{CommentGateway, PostedComment};
use crate::outputs::{OutputSink, StepOutput};
use crate::payload::{PayloadContext, TestPayload, build_payload};
use crate::prepare::{
    DEVICE_DEFAULTS, PrepareSchema, extract_create_comment_url, extract_json,
    render_prepare_comment,
};
use crate::testio::{CreatedTest, DeviceCatalog, DeviceResolver, ExploratoryTestGateway};
use crate::workspace::Workspace;

/// Action selected for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Post the pre-filled prepare comment.
    AddPrepareComment,
    /// Turn the submit comment into a persisted payload.
    CreatePayload,
    /// Submit the persisted payload to TestIO.
    TriggerTest,
    /// Post the recorded failure to the pull request.
    ReportFailure,
}

impl std::fmt::Display for Action {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::AddPrepareComment => "add-prepare-comment",
            Self::CreatePayload => "create-payload",
            Self::TriggerTest => "trigger-test",
            Self::ReportFailure => "report-failure",
        };
        formatter.write_str(label)
    }
}

/// Runs the workflow actions against injected collaborators.
pub struct Pipeline<'a> {
    context: &'a PipelineContext,
    workspace: &'a Workspace,
    schema: &'a PrepareSchema,
    outputs: &'a dyn OutputSink,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over the given context and local state.
    #[must_use]
    pub const fn new(
        context: &'a PipelineContext,
        workspace: &'a Workspace,
        schema: &'a PrepareSchema,
        outputs: &'a dyn OutputSink,
    ) -> Self {
        Self {
            context,
            workspace,
            schema,
            outputs,
        }
    }

    /// Posts the prepare comment answering a create command.
    ///
    /// # Errors
    ///
    /// Returns the first failure after recording it in the error file.
    pub async fn add_prepare_comment<G>(&self, github: &G) -> Result<PostedComment, TriggerError>
    where
        G: CommentGateway + ?Sized,
    {
        let mut run = PipelineRun::default();
        let result = async {
            let github_context = self.context.github()?;
            let create_comment_url = github_context.require_create_comment_url()?;
            let device = github_context
                .comment_body
                .as_deref()
                .and_then(|body| DEVICE_DEFAULTS.device_from_command(body));
            debug!(?device, "rendering prepare comment");

            let body = render_prepare_comment(device.as_ref(), create_comment_url)?;
            let posted = github
                .create_comment(&github_context.locator, &body)
                .await?;
            info!(comment_id = posted.id, "posted prepare comment");
            Ok::<_, TriggerError>(posted)
        }
        .await;
        self.fail_closed(&mut run, result)
    }

    /// Builds the payload from the submit comment and persists it.
    ///
    /// # Errors
    ///
    /// Returns the first failure after recording it in the error file.
    pub async fn create_payload<G, C>(
        &self,
        github: &G,
        catalog: &C,
    ) -> Result<TestPayload, TriggerError>
    where
        G: CommentGateway + ?Sized,
        C: DeviceCatalog,
    {
        let mut run = PipelineRun::default();
        let result = self.build_and_persist(&mut run, github, catalog).await;
        self.fail_closed(&mut run, result)
    }

    async fn build_and_persist<G, C>(
        &self,
        run: &mut PipelineRun,
        github: &G,
        catalog: &C,
    ) -> Result<TestPayload, TriggerError>
    where
        G: CommentGateway + ?Sized,
        C: DeviceCatalog,
    {
        if self.workspace.clear_payload()? {
            debug!(path = %self.workspace.payload_path(), "removed payload of an earlier run");
        }
        let github_context = self.context.github()?;
        let locator = &github_context.locator;
        let comment_id = github_context.require_comment_id()?;

        let fetched = github.comment_body(locator, comment_id).await?;
        self.outputs.record(&StepOutput::SubmitCommentId(comment_id))?;
        let body = fetched
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| TriggerError::EmptyComment {
                reference: comment_id.to_string(),
            })?;
        run.advance(PipelineStage::CommentFetched)?;

        let create_comment_url = extract_create_comment_url(&body).unwrap_or_default();
        self.outputs
            .record(&StepOutput::CreateCommentUrl(create_comment_url))?;

        let value = extract_json(&body)?;
        run.advance(PipelineStage::JsonExtracted)?;

        let prepare = self.schema.parse_prepare(value)?;
        run.advance(PipelineStage::SchemaValidated)?;

        let requirement = match prepare.device.as_ref() {
            Some(spec) => {
                let resolved = DeviceResolver::new(catalog).resolve(spec).await?;
                run.advance(PipelineStage::DeviceResolved)?;
                Some(resolved)
            }
            None => None,
        };

        let pr_title = github.pull_request_title(locator).await?;
        if pr_title.trim().is_empty() {
            return Err(TriggerError::Upstream {
                status: None,
                message: "Could not retrieve title of the PR".to_owned(),
            });
        }
        let payload = build_payload(
            &prepare,
            &PayloadContext {
                owner: locator.owner().as_str(),
                repo: locator.repository().as_str(),
                pr_number: locator.number().get(),
                pr_title: &pr_title,
            },
            requirement,
        );
        run.advance(PipelineStage::PayloadBuilt)?;

        let serialised = serde_json::to_string(&payload).map_err(|error| TriggerError::Io {
            message: format!("failed to serialise payload: {error}"),
        })?;
        let path = self.workspace.write_payload(&serialised)?;
        run.advance(PipelineStage::Persisted)?;
        info!(%path, title = %payload.exploratory_test.test_title, "persisted payload");

        Ok(payload)
    }

    /// Submits the persisted payload to TestIO.
    ///
    /// # Errors
    ///
    /// Returns the first failure after recording it in the error file.
    pub async fn trigger_test<P>(&self, provider: &P) -> Result<CreatedTest, TriggerError>
    where
        P: ExploratoryTestGateway + ?Sized,
    {
        let mut run = PipelineRun::starting_at(PipelineStage::Persisted);
        let result = async {
            self.context.provider()?;
            let raw = self.workspace.read_payload()?;
            let payload: TestPayload =
                serde_json::from_str(&raw).map_err(|error| TriggerError::Io {
                    message: format!(
                        "payload file '{}' is not a valid payload: {error}",
                        self.workspace.payload_path()
                    ),
                })?;

            let created = provider.create_exploratory_test(&payload).await?;
            run.advance(PipelineStage::Submitted)?;
            info!(test_id = created.id, "created exploratory test");
            self.outputs.record(&StepOutput::CreatedTestId(created.id))?;
            Ok::<_, TriggerError>(created)
        }
        .await;
        self.fail_closed(&mut run, result)
    }

    /// Posts the recorded failure, with the payload if one was written.
    ///
    /// The error file is left untouched when reporting itself fails.
    ///
    /// # Errors
    ///
    /// Returns configuration, I/O, and GitHub failures.
    pub async fn report_failure<G>(&self, github: &G) -> Result<PostedComment, TriggerError>
    where
        G: CommentGateway + ?Sized,
    {
        let github_context = self.context.github()?;
        let error_message = self.workspace.read_error()?;
        if error_message.is_none() {
            warn!(path = %self.workspace.error_path(), "no error message recorded");
        }
        let payload = self.workspace.read_payload_if_present()?;

        let body = render_failure_comment(
            error_message.as_deref(),
            payload.as_deref(),
            github_context.create_comment_url.as_deref(),
        )?;
        let posted = github
            .create_comment(&github_context.locator, &body)
            .await?;
        info!(comment_id = posted.id, "posted failure report");
        Ok(posted)
    }

    fn fail_closed<T>(
        &self,
        run: &mut PipelineRun,
        result: Result<T, TriggerError>,
    ) -> Result<T, TriggerError> {
        result.map_err(|failure| {
            let message = failure.to_string();
            error!(stage = %run.stage(), kind = ?failure.kind(), "{message}");
            run.fail(message.as_str());
            if let Err(write_error) = self.workspace.write_error(&message) {
                warn!(error = %write_error, "could not record failure message");
            }
            failure
        })
    }
}
