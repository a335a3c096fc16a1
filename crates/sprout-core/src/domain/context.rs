//! Template substitution context.
//!
//! A [`TemplateContext`] is an ordered token→value map merged from two
//! sources: platform facts computed once per process, and caller-supplied
//! values. The caller wins on name collision. Iteration order is insertion
//! order (`IndexMap`), which keeps rendered diagnostics stable.

use chrono::Datelike;
use indexmap::IndexMap;
use std::sync::OnceLock;

/// Ordered token → value mapping used by the template engine.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: IndexMap<String, String>,
}

impl TemplateContext {
    /// Empty context. Mostly useful in tests; production contexts start
    /// from [`TemplateContext::from_platform`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pre-populated with the platform facts.
    pub fn from_platform() -> Self {
        Self {
            values: platform_facts().clone(),
        }
    }

    /// Insert or replace a value. Later writers win, which is exactly the
    /// "caller overrides platform" merge rule.
    pub fn set(&mut self, token: impl Into<String>, value: impl Into<String>) {
        self.values.insert(token.into(), value.into());
    }

    /// Merge caller-supplied variables; the caller wins on collision.
    pub fn merge(&mut self, vars: &IndexMap<String, String>) {
        for (token, value) in vars {
            self.values.insert(token.clone(), value.clone());
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Platform facts, computed once per process.
///
/// These are the per-OS values templates need: executable names, path
/// separator, line ending. The set is fixed; project facts are layered on
/// top by the orchestrator.
fn platform_facts() -> &'static IndexMap<String, String> {
    static FACTS: OnceLock<IndexMap<String, String>> = OnceLock::new();
    FACTS.get_or_init(|| {
        let mut facts = IndexMap::new();
        let mut put = |k: &str, v: String| {
            facts.insert(k.to_string(), v);
        };

        put("PLATFORM_SYSTEM", std::env::consts::OS.to_string());
        put("PATH_SEP", std::path::MAIN_SEPARATOR.to_string());
        if cfg!(windows) {
            put("LINE_ENDING", "\r\n".to_string());
            put("PYTHON_PATH", "python".to_string());
            put("NPM_EXECUTABLE", "npm.cmd".to_string());
            put("SHELL_EXT", ".bat".to_string());
        } else {
            put("LINE_ENDING", "\n".to_string());
            put("PYTHON_PATH", "python3".to_string());
            put("NPM_EXECUTABLE", "npm".to_string());
            put("SHELL_EXT", ".sh".to_string());
        }
        put("NODE_EXECUTABLE", "node".to_string());
        put("CURRENT_YEAR", chrono::Utc::now().year().to_string());

        facts
    })
}
