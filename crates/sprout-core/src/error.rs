//! Unified error handling for Sprout Core.
//!
//! Exactly three kinds cross component boundaries: validation failures
//! (caught before any side effect), stage-tagged service failures, and
//! template failures. Lower-level `io::Error`s are wrapped with the failing
//! operation name before they leave the component that hit them — callers
//! match on the kind, never on OS error codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Stage;

/// Root error type for Sprout Core operations.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// A request violated an input rule. Raised before any side effect.
    #[error("validation failed: {rule}")]
    Validation { rule: String },

    /// A pipeline stage failed mid-flight. Carries the partial list of
    /// artifacts already produced so the caller can clean up or resume.
    #[error("{stage} stage failed: {detail}")]
    Service {
        stage: Stage,
        detail: String,
        created_files: Vec<PathBuf>,
        created_dirs: Vec<PathBuf>,
    },

    /// A template was missing, unreadable, or used an unsupported token.
    #[error("template error in {}: {detail}", path.display())]
    Template { path: PathBuf, detail: String },
}

impl Error {
    pub fn validation(rule: impl Into<String>) -> Self {
        Self::Validation { rule: rule.into() }
    }

    pub fn service(stage: Stage, detail: impl Into<String>) -> Self {
        Self::Service {
            stage,
            detail: detail.into(),
            created_files: Vec::new(),
            created_dirs: Vec::new(),
        }
    }

    pub fn template(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Attach the artifacts produced so far to a service error.
    ///
    /// No-op for the other kinds: validation errors precede all side
    /// effects, and template errors are rethrown by the owning stage.
    pub fn with_partial(mut self, files: &[PathBuf], dirs: &[PathBuf]) -> Self {
        if let Self::Service {
            created_files,
            created_dirs,
            ..
        } = &mut self
        {
            created_files.extend_from_slice(files);
            created_dirs.extend_from_slice(dirs);
        }
        self
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { rule } => vec![
                format!("Input was rejected: {rule}"),
                "Check the project name, destination and variant flags".into(),
            ],
            Self::Service {
                stage,
                created_files,
                created_dirs,
                ..
            } => {
                let mut out = vec![format!("The {stage} stage did not complete")];
                if !created_files.is_empty() || !created_dirs.is_empty() {
                    out.push(format!(
                        "{} file(s) and {} directory(ies) were already created and may need cleanup",
                        created_files.len(),
                        created_dirs.len()
                    ));
                }
                out.push("Re-run with -v for the underlying operation".into());
                out
            }
            Self::Template { path, .. } => vec![
                format!("Template at fault: {}", path.display()),
                "The bundled asset tree may be incomplete; check the assets root".into(),
            ],
        }
    }
}

/// Convenient result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_partial_fills_service_lists() {
        let err = Error::service(Stage::Files, "disk full").with_partial(
            &[PathBuf::from("a.txt")],
            &[PathBuf::from("src")],
        );
        match err {
            Error::Service {
                created_files,
                created_dirs,
                ..
            } => {
                assert_eq!(created_files, vec![PathBuf::from("a.txt")]);
                assert_eq!(created_dirs, vec![PathBuf::from("src")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn with_partial_ignores_validation() {
        let err = Error::validation("bad name").with_partial(&[PathBuf::from("a")], &[]);
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn service_display_names_stage() {
        let err = Error::service(Stage::Structure, "mkdir failed");
        assert!(err.to_string().contains("structure"));
    }

    #[test]
    fn suggestions_mention_partial_artifacts() {
        let err = Error::service(Stage::Files, "x").with_partial(&[PathBuf::from("a")], &[]);
        assert!(err.suggestions().iter().any(|s| s.contains("cleanup")));
    }
}
