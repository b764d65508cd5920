//! Stage tracking for a single pipeline invocation.

use std::fmt;

use crate::error::TriggerError;

/// Stages a `create-payload` and `trigger-test` run pass through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Nothing has happened yet.
    Idle,
    /// The submit comment body was read.
    CommentFetched,
    /// The fenced JSON block was parsed.
    JsonExtracted,
    /// The JSON passed schema validation.
    SchemaValidated,
    /// The device spec was resolved to catalog ids.
    DeviceResolved,
    /// The submission payload was assembled.
    PayloadBuilt,
    /// The payload reached the handoff file.
    Persisted,
    /// The provider accepted the payload.
    Submitted,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::CommentFetched => "comment fetched",
            Self::JsonExtracted => "json extracted",
            Self::SchemaValidated => "schema validated",
            Self::DeviceResolved => "device resolved",
            Self::PayloadBuilt => "payload built",
            Self::Persisted => "persisted",
            Self::Submitted => "submitted",
        };
        formatter.write_str(label)
    }
}

/// Where a run currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// The run last completed `stage`.
    At(PipelineStage),
    /// The run failed while moving on from `stage`.
    Failed {
        /// Last stage completed before the failure.
        stage: PipelineStage,
        /// Message persisted for the failure report.
        message: String,
    },
}

/// Forward-only tracker of a run's progress.
///
/// `Submitted` and `Failed` are terminal. Stages may be skipped (a request
/// without a device never reaches `DeviceResolved`) but never revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    state: RunState,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::starting_at(PipelineStage::Idle)
    }
}

impl PipelineRun {
    /// Starts a run that resumes after `stage`, e.g. a `trigger-test`
    /// invocation that picks up an already persisted payload.
    #[must_use]
    pub const fn starting_at(stage: PipelineStage) -> Self {
        Self {
            state: RunState::At(stage),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &RunState {
        &self.state
    }

    /// Last stage completed, whether or not the run failed afterwards.
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        match &self.state {
            RunState::At(stage) | RunState::Failed { stage, .. } => *stage,
        }
    }

    /// Whether the run can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            RunState::At(PipelineStage::Submitted) | RunState::Failed { .. }
        )
    }

    /// Records completion of `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Configuration`] when the run is terminal or
    /// `next` does not lie ahead of the current stage.
    pub fn advance(&mut self, next: PipelineStage) -> Result<(), TriggerError> {
        let current = self.stage();
        if self.is_terminal() || next <= current {
            return Err(TriggerError::Configuration {
                message: format!("pipeline cannot move from {current} to {next}"),
            });
        }
        self.state = RunState::At(next);
        Ok(())
    }

    /// Marks the run failed after its current stage. A terminal run is left
    /// unchanged.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.state = RunState::Failed {
            stage: self.stage(),
            message: message.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PipelineRun, PipelineStage, RunState};

    #[rstest]
    fn advances_and_skips_optional_stages() {
        let mut run = PipelineRun::default();

        run.advance(PipelineStage::CommentFetched)
            .expect("first step should be accepted");
        run.advance(PipelineStage::SchemaValidated)
            .expect("skipping ahead should be accepted");
        run.advance(PipelineStage::PayloadBuilt)
            .expect("device resolution is optional");

        assert_eq!(run.stage(), PipelineStage::PayloadBuilt);
        assert!(!run.is_terminal());
    }

    #[rstest]
    #[case::same(PipelineStage::JsonExtracted)]
    #[case::backwards(PipelineStage::CommentFetched)]
    fn rejects_non_forward_moves(#[case] next: PipelineStage) {
        let mut run = PipelineRun::starting_at(PipelineStage::JsonExtracted);

        assert!(run.advance(next).is_err());
        assert_eq!(run.stage(), PipelineStage::JsonExtracted);
    }

    #[rstest]
    fn submitted_is_terminal() {
        let mut run = PipelineRun::starting_at(PipelineStage::Persisted);
        run.advance(PipelineStage::Submitted)
            .expect("submission should be accepted");

        run.fail("late failure");

        assert!(run.is_terminal());
        assert_eq!(run.state(), &RunState::At(PipelineStage::Submitted));
    }

    #[rstest]
    fn failure_keeps_last_stage_and_is_terminal() {
        let mut run = PipelineRun::starting_at(PipelineStage::SchemaValidated);

        run.fail("Category 'phablet' is not valid");

        assert_eq!(
            run.state(),
            &RunState::Failed {
                stage: PipelineStage::SchemaValidated,
                message: "Category 'phablet' is not valid".to_owned(),
            }
        );
        assert!(run.advance(PipelineStage::DeviceResolved).is_err());
    }
}
