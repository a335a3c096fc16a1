//! Pipeline stages and their results.
//!
//! Each stage folds one tagged [`StageOutcome`] into the running
//! [`CreationResult`] — a typed payload per stage rather than a
//! loosely-keyed map. The result is handed to the caller once and never
//! mutated after return.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::Variant;

// ── Stage ────────────────────────────────────────────────────────────────────

/// The fixed stages of the creation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Validate,
    Variant,
    Structure,
    Files,
    Environment,
    Dependencies,
    Tooling,
    Vcs,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Variant => "variant",
            Self::Structure => "structure",
            Self::Files => "files",
            Self::Environment => "environment",
            Self::Dependencies => "dependencies",
            Self::Tooling => "tooling",
            Self::Vcs => "vcs",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StageOutcome ─────────────────────────────────────────────────────────────

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Ran to completion.
    Completed,
    /// Ran, but something non-fatal went wrong; see the warnings.
    Degraded,
    /// Deliberately not run (minimal mode).
    Skipped,
    /// Dry run: describes what would happen.
    Planned,
}

/// The typed payload one stage contributes to the overall result.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
    pub tools: Vec<String>,
    pub warnings: Vec<String>,
}

impl StageOutcome {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Completed,
            files: Vec::new(),
            dirs: Vec::new(),
            tools: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn skipped(stage: Stage) -> Self {
        Self {
            status: StageStatus::Skipped,
            ..Self::new(stage)
        }
    }

    pub fn set_planned(&mut self) {
        self.status = StageStatus::Planned;
    }

    pub fn record_file(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub fn record_dir(&mut self, path: PathBuf) {
        self.dirs.push(path);
    }

    pub fn record_tool(&mut self, tool: impl Into<String>) {
        self.tools.push(tool.into());
    }

    /// Record a non-fatal problem. Degrades the stage status, except for
    /// planned (dry-run) stages which stay planned.
    pub fn warn(&mut self, message: impl Into<String>) {
        if self.status != StageStatus::Planned {
            self.status = StageStatus::Degraded;
        }
        self.warnings.push(message.into());
    }
}

// ── CreationResult ───────────────────────────────────────────────────────────

/// The durable output of one creation call.
#[derive(Debug, Clone, Serialize)]
pub struct CreationResult {
    pub success: bool,
    pub variant: Variant,
    pub dry_run: bool,
    pub stages: Vec<StageOutcome>,
    /// Present when the pipeline stopped early without raising (user
    /// cancel); hard failures are returned as errors instead.
    pub error: Option<String>,
}

impl CreationResult {
    pub fn new(variant: Variant, dry_run: bool) -> Self {
        Self {
            success: false,
            variant,
            dry_run,
            stages: Vec::new(),
            error: None,
        }
    }

    /// Start a new stage outcome and hand it out for recording.
    pub fn begin(&mut self, stage: Stage) -> &mut StageOutcome {
        self.stages.push(StageOutcome::new(stage));
        self.stages.last_mut().expect("stage just pushed")
    }

    pub fn push(&mut self, outcome: StageOutcome) {
        self.stages.push(outcome);
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn cancel(&mut self, at: &Path) {
        self.success = false;
        self.error = Some(format!("cancelled by user at {}", at.display()));
    }

    pub fn created_files(&self) -> Vec<&Path> {
        self.stages
            .iter()
            .flat_map(|s| s.files.iter().map(PathBuf::as_path))
            .collect()
    }

    pub fn created_dirs(&self) -> Vec<&Path> {
        self.stages
            .iter()
            .flat_map(|s| s.dirs.iter().map(PathBuf::as_path))
            .collect()
    }

    pub fn configured_tools(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|s| s.tools.iter().map(String::as_str))
            .collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|s| s.warnings.iter().map(String::as_str))
            .collect()
    }
}

// ── SetupResult ──────────────────────────────────────────────────────────────

/// Output of configuring an existing project (environment, dependencies,
/// tooling only — nothing structural).
#[derive(Debug, Clone, Serialize)]
pub struct SetupResult {
    pub success: bool,
    pub variant: Variant,
    pub configured_tools: Vec<String>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_degrades_status() {
        let mut outcome = StageOutcome::new(Stage::Environment);
        assert_eq!(outcome.status, StageStatus::Completed);
        outcome.warn("python missing");
        assert_eq!(outcome.status, StageStatus::Degraded);
    }

    #[test]
    fn warn_keeps_planned_status() {
        let mut outcome = StageOutcome::new(Stage::Environment);
        outcome.set_planned();
        outcome.warn("noted");
        assert_eq!(outcome.status, StageStatus::Planned);
    }

    #[test]
    fn result_flattens_across_stages() {
        let mut result = CreationResult::new(Variant::Py, false);
        result.begin(Stage::Structure).record_dir("src".into());
        let files = result.begin(Stage::Files);
        files.record_file("pyproject.toml".into());
        files.warn("skipped one");

        assert_eq!(result.created_dirs(), vec![Path::new("src")]);
        assert_eq!(result.created_files(), vec![Path::new("pyproject.toml")]);
        assert_eq!(result.warnings(), vec!["skipped one"]);
    }

    #[test]
    fn cancel_records_path_and_clears_success() {
        let mut result = CreationResult::new(Variant::Js, false);
        result.success = true;
        result.cancel(Path::new("out/index.js"));
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("index.js"));
    }

    #[test]
    fn stage_lookup_finds_outcome() {
        let mut result = CreationResult::new(Variant::Py, false);
        result.push(StageOutcome::skipped(Stage::Vcs));
        assert_eq!(
            result.stage(Stage::Vcs).map(|s| s.status),
            Some(StageStatus::Skipped)
        );
        assert!(result.stage(Stage::Files).is_none());
    }
}
