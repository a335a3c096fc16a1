//! Fixed-answer decision provider.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use sprout_core::application::ports::DecisionProvider;
use sprout_core::domain::ConflictDecision;

/// Answers conflicts from a pre-recorded script, then from a fallback.
///
/// Used by tests and by non-interactive CLI runs (piped stdin), where
/// prompting is impossible and the safe policy is fixed up front.
pub struct ScriptedDecisions {
    script: Mutex<VecDeque<ConflictDecision>>,
    fallback: ConflictDecision,
    confirm_answer: bool,
}

impl ScriptedDecisions {
    /// Always answer with `fallback`; confirmations answer yes.
    pub fn always(fallback: ConflictDecision) -> Self {
        Self::new(Vec::new(), fallback)
    }

    /// Consume `script` in order, then fall back.
    pub fn new(script: Vec<ConflictDecision>, fallback: ConflictDecision) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            confirm_answer: true,
        }
    }

    pub fn with_confirm_answer(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide_conflict(&self, target: &Path, _is_directory: bool) -> io::Result<ConflictDecision> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "decision script poisoned"))?;
        let decision = script.pop_front().unwrap_or(self.fallback);
        debug!(target = %target.display(), %decision, "scripted decision");
        Ok(decision)
    }

    fn confirm(&self, _question: &str) -> io::Result<bool> {
        Ok(self.confirm_answer)
    }
}
