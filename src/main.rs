//! Workflow entrypoint running one trigger action per invocation.

use std::process::ExitCode;

use ortho_config::OrthoConfig;
use testio_trigger::{
    Action, DeviceCatalogClient, ExploratoryTestClient, GithubOutputFileSink,
    LogOutputSink, OctocrabCommentGateway, OutputSink, Pipeline, PipelineContext, TriggerConfig,
    TriggerError, Workspace,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(kind = ?failure.kind(), "{failure}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), TriggerError> {
    let config = load_config()?;
    let action = config.require_action()?;
    let workspace = config.workspace();
    info!(%action, root = %workspace.root(), "starting");

    let setup = Setup {
        workspace: &workspace,
        action,
    };
    let context = setup.check(config.pipeline_context())?;
    let schema = setup.check(config.load_schema())?;
    let outputs: Box<dyn OutputSink> = match config.resolve_github_output() {
        Some(path) => Box::new(GithubOutputFileSink::new(path)),
        None => Box::new(LogOutputSink),
    };
    let pipeline = Pipeline::new(&context, &workspace, &schema, outputs.as_ref());

    match action {
        Action::AddPrepareComment => {
            let github = setup.check(github_gateway(&config))?;
            pipeline.add_prepare_comment(&github).await.map(drop)
        }
        Action::CreatePayload => {
            let github = setup.check(github_gateway(&config))?;
            let catalog = setup.check(catalog_client(&config))?;
            pipeline.create_payload(&github, &catalog).await.map(drop)
        }
        Action::TriggerTest => {
            let provider = setup.check(provider_client(&config, &context))?;
            pipeline.trigger_test(&provider).await.map(drop)
        }
        Action::ReportFailure => {
            let github = github_gateway(&config)?;
            pipeline.report_failure(&github).await.map(drop)
        }
    }
}

/// Records failures raised before the pipeline takes over, so that the
/// reporting action can still post them.
struct Setup<'a> {
    workspace: &'a Workspace,
    action: Action,
}

impl Setup<'_> {
    fn check<T>(&self, result: Result<T, TriggerError>) -> Result<T, TriggerError> {
        result.map_err(|failure| {
            if self.action != Action::ReportFailure {
                if let Err(write_error) = self.workspace.write_error(&failure.to_string()) {
                    warn!(error = %write_error, "could not record failure message");
                }
            }
            failure
        })
    }
}

fn github_gateway(config: &TriggerConfig) -> Result<OctocrabCommentGateway, TriggerError> {
    let token = config.resolve_token()?;
    OctocrabCommentGateway::for_token(&token, &config.github_api_url)
}

fn catalog_client(config: &TriggerConfig) -> Result<DeviceCatalogClient, TriggerError> {
    DeviceCatalogClient::new(config.devices_api_url.as_str(), config.request_timeout())
}

fn provider_client(
    config: &TriggerConfig,
    context: &PipelineContext,
) -> Result<ExploratoryTestClient, TriggerError> {
    let provider = context.provider()?;
    ExploratoryTestClient::new(
        config.customer_api_url.as_str(),
        provider.product_id.clone(),
        provider.token.clone(),
        config.request_timeout(),
    )
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`TriggerError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<TriggerConfig, TriggerError> {
    TriggerConfig::load().map_err(|error| TriggerError::Configuration {
        message: error.to_string(),
    })
}
