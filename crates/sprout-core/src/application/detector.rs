//! Variant detection from existing files.
//!
//! Given a project root and a target language, infer the project flavor
//! from marker files. Detection is pure for a given filesystem snapshot:
//! the same directory contents always produce the same answer. Re-running
//! after files change may yield a different answer — that is inherent, not
//! a defect.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::domain::{Language, Variant};

/// Infers a project variant from marker files.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantDetector;

impl VariantDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the variant of the project at `root`.
    ///
    /// A missing root, or a root without any markers, yields the
    /// language's configured default variant.
    pub fn detect(&self, root: &Path, language: Language) -> Variant {
        let variant = match language {
            Language::JavaScript => detect_javascript(root),
            Language::Python => detect_python(root),
        };
        debug!(root = %root.display(), %language, %variant, "variant detected");
        variant
    }
}

/// JavaScript decision table, first match wins:
/// react+ts → react-ts; vue+ts → vue-ts; react → react; vue → vue;
/// ts only → ts; else → js.
fn detect_javascript(root: &Path) -> Variant {
    let package = read_package_json(root);
    let has_react = has_dependency(package.as_ref(), "react");
    let has_vue = has_dependency(package.as_ref(), "vue");
    let has_ts =
        root.join("tsconfig.json").is_file() || has_dependency(package.as_ref(), "typescript");

    match (has_react, has_vue, has_ts) {
        (true, _, true) => Variant::ReactTs,
        (_, true, true) => Variant::VueTs,
        (true, _, false) => Variant::React,
        (_, true, false) => Variant::Vue,
        (false, false, true) => Variant::Ts,
        (false, false, false) => Language::JavaScript.default_variant(),
    }
}

/// Python: django markers (`manage.py`, or the literal token "django" in
/// `pyproject.toml` / `requirements.txt`) → django; else → py.
fn detect_python(root: &Path) -> Variant {
    if root.join("manage.py").is_file() {
        return Variant::Django;
    }
    for manifest in ["pyproject.toml", "requirements.txt"] {
        if file_mentions(root.join(manifest).as_path(), "django") {
            return Variant::Django;
        }
    }
    Language::Python.default_variant()
}

fn read_package_json(root: &Path) -> Option<Value> {
    let path = root.join("package.json");
    let text = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            // Unparseable manifest: fall through to the default variant
            // rather than guessing from broken input.
            warn!(path = %path.display(), error = %e, "ignoring malformed package.json");
            None
        }
    }
}

fn has_dependency(package: Option<&Value>, name: &str) -> bool {
    let Some(package) = package else {
        return false;
    };
    ["dependencies", "devDependencies"].iter().any(|section| {
        package
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|deps| deps.contains_key(name))
    })
}

fn file_mentions(path: &Path, token: &str) -> bool {
    fs::read_to_string(path)
        .map(|text| text.to_ascii_lowercase().contains(token))
        .unwrap_or(false)
}
