//! Terminal prompts for conflict decisions.

use std::io;
use std::path::Path;

use dialoguer::{Confirm, Select};
use tracing::debug;

use sprout_core::application::ports::DecisionProvider;
use sprout_core::domain::ConflictDecision;

const CHOICES: [&str; 4] = ["Overwrite", "Skip", "Merge", "Cancel"];

/// Asks the user on the terminal, one decision per conflicting path.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompter;

impl InteractivePrompter {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProvider for InteractivePrompter {
    fn decide_conflict(&self, target: &Path, is_directory: bool) -> io::Result<ConflictDecision> {
        let kind = if is_directory { "Directory" } else { "File" };
        let selection = Select::new()
            .with_prompt(format!("{kind} {} already exists", target.display()))
            .items(&CHOICES)
            .default(default_choice(is_directory))
            .interact()
            .map_err(into_io)?;
        let decision = decision_from_index(selection);
        debug!(target = %target.display(), %decision, "user decided");
        Ok(decision)
    }

    fn confirm(&self, question: &str) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact()
            .map_err(into_io)
    }
}

/// Safe answers come first: Skip for files, Merge for directories.
fn default_choice(is_directory: bool) -> usize {
    if is_directory { 2 } else { 1 }
}

fn decision_from_index(index: usize) -> ConflictDecision {
    match index {
        0 => ConflictDecision::Overwrite,
        1 => ConflictDecision::Skip,
        2 => ConflictDecision::Merge,
        _ => ConflictDecision::Cancel,
    }
}

fn into_io(e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}
