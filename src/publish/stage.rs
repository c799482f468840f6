//! Publish Stages
//!
//! The fallback chain as an explicit state machine. The pipeline performs the
//! work for the current stage, reports an outcome, and asks [`PublishStage::next`]
//! where to go.

use serde::{Deserialize, Serialize};

/// Delivery method that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishMethod {
    DirectCommit,
    PullRequest,
    LocalSave,
}

impl std::fmt::Display for PublishMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectCommit => write!(f, "direct-commit"),
            Self::PullRequest => write!(f, "pull-request"),
            Self::LocalSave => write!(f, "local-save"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Start,
    /// 1-based attempt index
    DirectCommit { attempt: u32 },
    PullRequest,
    LocalSave,
    Completed(PublishMethod),
    /// Local save failed; nothing left to try
    Aborted,
}

/// What happened while executing a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// No repository host credential or configuration
    NoHost,
    HostReady,
    Succeeded,
    Failed,
}

impl PublishStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Aborted)
    }

    /// Transition function. Outcomes that do not apply to a stage leave it unchanged.
    pub fn next(self, outcome: StageOutcome, max_attempts: u32) -> Self {
        use StageOutcome::*;

        match (self, outcome) {
            (Self::Start, NoHost) => Self::LocalSave,
            (Self::Start, HostReady) => Self::DirectCommit { attempt: 1 },

            (Self::DirectCommit { .. }, Succeeded) => Self::Completed(PublishMethod::DirectCommit),
            (Self::DirectCommit { attempt }, Failed) if attempt < max_attempts => {
                Self::DirectCommit {
                    attempt: attempt + 1,
                }
            }
            (Self::DirectCommit { .. }, Failed) => Self::PullRequest,

            (Self::PullRequest, Succeeded) => Self::Completed(PublishMethod::PullRequest),
            (Self::PullRequest, Failed) => Self::LocalSave,

            (Self::LocalSave, Succeeded) => Self::Completed(PublishMethod::LocalSave),
            (Self::LocalSave, Failed) => Self::Aborted,

            (stage, _) => stage,
        }
    }
}

impl std::fmt::Display for PublishStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::DirectCommit { attempt } => write!(f, "direct-commit (attempt {})", attempt),
            Self::PullRequest => write!(f, "pull-request"),
            Self::LocalSave => write!(f, "local-save"),
            Self::Completed(method) => write!(f, "completed via {}", method),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(outcomes: &[StageOutcome], max_attempts: u32) -> Vec<PublishStage> {
        let mut stage = PublishStage::Start;
        let mut path = vec![stage];
        for &outcome in outcomes {
            stage = stage.next(outcome, max_attempts);
            path.push(stage);
        }
        path
    }

    #[test]
    fn test_no_host_goes_straight_to_local_save() {
        let path = walk(&[StageOutcome::NoHost, StageOutcome::Succeeded], 2);
        assert_eq!(
            path[1..],
            [
                PublishStage::LocalSave,
                PublishStage::Completed(PublishMethod::LocalSave)
            ]
        );
    }

    #[test]
    fn test_retry_then_pull_request() {
        use StageOutcome::*;
        let path = walk(&[HostReady, Failed, Failed, Succeeded], 2);
        assert_eq!(
            path,
            vec![
                PublishStage::Start,
                PublishStage::DirectCommit { attempt: 1 },
                PublishStage::DirectCommit { attempt: 2 },
                PublishStage::PullRequest,
                PublishStage::Completed(PublishMethod::PullRequest),
            ]
        );
    }

    #[test]
    fn test_single_attempt_bound() {
        let stage = PublishStage::DirectCommit { attempt: 1 }.next(StageOutcome::Failed, 1);
        assert_eq!(stage, PublishStage::PullRequest);
    }

    #[test]
    fn test_full_fallback_chain() {
        use StageOutcome::*;
        let path = walk(&[HostReady, Failed, Failed, Failed, Succeeded], 2);
        assert_eq!(
            path.last(),
            Some(&PublishStage::Completed(PublishMethod::LocalSave))
        );
    }

    #[test]
    fn test_local_save_failure_aborts() {
        let stage = PublishStage::LocalSave.next(StageOutcome::Failed, 2);
        assert_eq!(stage, PublishStage::Aborted);
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_terminal_stages_are_sticky() {
        let done = PublishStage::Completed(PublishMethod::DirectCommit);
        assert_eq!(done.next(StageOutcome::Failed, 2), done);
        assert_eq!(PublishStage::Aborted.next(StageOutcome::Succeeded, 2), PublishStage::Aborted);
    }

    #[test]
    fn test_method_serde_names() {
        assert_eq!(
            serde_json::to_string(&PublishMethod::PullRequest).unwrap(),
            "\"pull-request\""
        );
        assert_eq!(PublishMethod::LocalSave.to_string(), "local-save");
    }
}
