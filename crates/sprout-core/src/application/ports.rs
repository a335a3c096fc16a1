//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits are the only channels through which the pipeline touches
//! the outside world beyond the destination directory: asking a human (or a
//! script) about conflicts, probing for installed tools, and running child
//! processes. The `sprout-adapters` crate provides the production
//! implementations; tests supply canned ones.
//!
//! The ports speak `io::Result` — they are the raw boundary. The
//! orchestrator wraps any failure into a core error kind (or a warning)
//! with the owning stage attached before it propagates further.

use std::io;
use std::path::Path;
use std::time::Duration;

use crate::domain::ConflictDecision;

/// Result of probing for an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub available: bool,
    pub version: Option<String>,
}

impl ToolStatus {
    pub fn missing() -> Self {
        Self {
            available: false,
            version: None,
        }
    }

    pub fn found(version: Option<String>) -> Self {
        Self {
            available: true,
            version,
        }
    }
}

/// Captured output of a finished child process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Port for conflict decisions and yes/no confirmations.
///
/// Implemented by:
/// - `sprout_adapters::InteractivePrompter` (terminal prompts)
/// - `sprout_adapters::ScriptedDecisions` (fixed answers, for tests and
///   non-interactive runs)
#[cfg_attr(test, mockall::automock)]
pub trait DecisionProvider: Send + Sync {
    /// Decide what to do about one existing target path.
    fn decide_conflict(&self, target: &Path, is_directory: bool) -> io::Result<ConflictDecision>;

    /// Ask a yes/no question.
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Port for runtime/tool availability checks.
#[cfg_attr(test, mockall::automock)]
pub trait ToolProbe: Send + Sync {
    /// Check whether `name` resolves to a runnable tool, reporting its
    /// version when it can be determined cheaply.
    fn check_available(&self, name: &str) -> ToolStatus;
}

/// Port for blocking child-process execution.
///
/// Always invoked with an explicit working directory; implementations must
/// enforce the timeout and report expiry as `io::ErrorKind::TimedOut`.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run<'a>(&self, argv: &[&'a str], cwd: &Path, timeout: Duration) -> io::Result<CommandOutput>;
}
