//! Step outputs handed back to the workflow runner.
//!
//! Each pipeline action records a few values that later workflow steps read,
//! such as the id of the created test. Runners expose a file through
//! `GITHUB_OUTPUT` that collects `name=value` lines.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use tracing::info;

use crate::error::TriggerError;

/// A value published for later workflow steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutput {
    /// Id of the comment that carried the submitted prepare object.
    SubmitCommentId(u64),
    /// URL of the comment that requested the test.
    CreateCommentUrl(String),
    /// Id of the exploratory test created by the provider.
    CreatedTestId(u64),
}

impl StepOutput {
    /// Output name as read by the workflow.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitCommentId(_) => "testio-submit-comment-id",
            Self::CreateCommentUrl(_) => "testio-create-comment-url",
            Self::CreatedTestId(_) => "testio-created-test-id",
        }
    }

    /// Output value rendered as text.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::SubmitCommentId(id) | Self::CreatedTestId(id) => id.to_string(),
            Self::CreateCommentUrl(url) => url.clone(),
        }
    }
}

/// A sink that can record step outputs.
pub trait OutputSink: Send + Sync {
    /// Records a step output.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the output cannot be stored.
    fn record(&self, output: &StepOutput) -> Result<(), TriggerError>;
}

/// Logs outputs instead of storing them; used outside a workflow runner.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutputSink;

impl OutputSink for LogOutputSink {
    fn record(&self, output: &StepOutput) -> Result<(), TriggerError> {
        info!(name = output.name(), value = %output.value(), "step output");
        Ok(())
    }
}

/// Appends `name=value` lines to the runner's output file.
#[derive(Debug, Clone)]
pub struct GithubOutputFileSink {
    path: Utf8PathBuf,
}

impl GithubOutputFileSink {
    /// Creates a sink appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for GithubOutputFileSink {
    fn record(&self, output: &StepOutput) -> Result<(), TriggerError> {
        let io_error = |error: std::io::Error| TriggerError::Io {
            message: format!("failed to append output to '{}': {error}", self.path),
        };

        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = self.path.file_name().ok_or_else(|| TriggerError::Io {
            message: format!("output path '{}' has no file name", self.path),
        })?;

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        let mut file = dir.open_with(file_name, &options).map_err(io_error)?;

        writeln!(file, "{}={}", output.name(), output.value()).map_err(io_error)
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::{OutputSink, StepOutput};
    use crate::error::TriggerError;

    /// Collects outputs in memory for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        outputs: Mutex<Vec<StepOutput>>,
    }

    impl RecordingSink {
        pub(crate) fn take(&self) -> Vec<StepOutput> {
            self.outputs
                .lock()
                .expect("outputs mutex should be available")
                .drain(..)
                .collect()
        }
    }

    impl OutputSink for RecordingSink {
        fn record(&self, output: &StepOutput) -> Result<(), TriggerError> {
            self.outputs
                .lock()
                .expect("outputs mutex should be available")
                .push(output.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;

    use super::recording::RecordingSink;
    use super::{GithubOutputFileSink, OutputSink, StepOutput};

    #[rstest]
    fn recording_sink_captures_outputs() {
        let sink = RecordingSink::default();
        sink.record(&StepOutput::CreatedTestId(1234))
            .expect("record should succeed");

        assert_eq!(sink.take(), vec![StepOutput::CreatedTestId(1234)]);
    }

    #[rstest]
    #[case::submit(StepOutput::SubmitCommentId(5), "testio-submit-comment-id", "5")]
    #[case::url(
        StepOutput::CreateCommentUrl("https://example.com/c".to_owned()),
        "testio-create-comment-url",
        "https://example.com/c"
    )]
    #[case::created(StepOutput::CreatedTestId(9), "testio-created-test-id", "9")]
    fn outputs_have_stable_names(
        #[case] output: StepOutput,
        #[case] name: &str,
        #[case] value: &str,
    ) {
        assert_eq!(output.name(), name);
        assert_eq!(output.value(), value);
    }

    #[rstest]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("output"))
            .expect("temp path should be UTF-8");
        std::fs::write(&path, "existing=1\n").expect("seed file should be written");
        let sink = GithubOutputFileSink::new(path.clone());

        sink.record(&StepOutput::SubmitCommentId(5))
            .expect("first record should succeed");
        sink.record(&StepOutput::CreatedTestId(9))
            .expect("second record should succeed");

        let contents = std::fs::read_to_string(&path).expect("output file should be readable");
        assert_eq!(
            contents,
            "existing=1\ntestio-submit-comment-id=5\ntestio-created-test-id=9\n"
        );
    }
}
