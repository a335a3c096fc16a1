//! Project creation request.
//!
//! A [`ProjectRequest`] is built at the command boundary, validated once,
//! and then read-only: fields are private and exposed through accessors so
//! a request that passed validation cannot drift afterwards.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::domain::{Language, Variant};
use crate::error::{Error, Result};

/// Every recognized creation option, named once.
#[derive(Debug, Clone, Default)]
pub struct CreationOptions {
    /// Produce only structure + files; skip environment, dependencies,
    /// tooling and VCS init.
    pub minimal: bool,
    /// Resolve conflicts without prompting: overwrite files, merge
    /// directories.
    pub force: bool,
    /// Walk the stages and report what would run, with zero side effects.
    pub dry_run: bool,
    /// Extra template variables; win over platform and project facts.
    pub extra_vars: IndexMap<String, String>,
}

/// A validated request to create one project.
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    language: Language,
    variant: Option<Variant>,
    name: String,
    destination: PathBuf,
    options: CreationOptions,
}

impl ProjectRequest {
    /// Validate and freeze a request.
    ///
    /// Rules checked here are the ones that need no filesystem access;
    /// destination-state checks belong to the orchestrator's validate
    /// stage.
    pub fn new(
        language: Language,
        variant: Option<Variant>,
        name: impl Into<String>,
        destination: impl Into<PathBuf>,
        options: CreationOptions,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        if let Some(variant) = variant {
            if !language.supports(variant) {
                return Err(Error::validation(format!(
                    "variant '{variant}' is not supported for {language} (supported: {})",
                    supported_list(language)
                )));
            }
        }

        Ok(Self {
            language,
            variant,
            name,
            destination: destination.into(),
            options,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the project root to create.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn minimal(&self) -> bool {
        self.options.minimal
    }

    pub fn force(&self) -> bool {
        self.options.force
    }

    pub fn dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn extra_vars(&self) -> &IndexMap<String, String> {
        &self.options.extra_vars
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("project name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(Error::validation("project name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(Error::validation(
            "project name cannot contain path separators",
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::validation(
            "project name may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

fn supported_list(language: Language) -> String {
    language
        .supported_variants()
        .iter()
        .map(Variant::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
