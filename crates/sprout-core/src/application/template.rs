//! `{{TOKEN}}` template rendering.
//!
//! Substitution is single-pass and non-recursive: a substituted value that
//! itself contains `{{OTHER}}` is emitted as-is, so a value can never drive
//! re-expansion. Tokens come from the fixed vocabulary below; anything else
//! found during rendering is a hard template error — unresolved `{{…}}`
//! must never reach generated output.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;

use crate::domain::{Stage, TemplateContext};
use crate::error::{Error, Result};

/// The fixed token vocabulary: platform facts plus project facts.
pub const SUPPORTED_TOKENS: &[&str] = &[
    // platform facts
    "PLATFORM_SYSTEM",
    "PATH_SEP",
    "LINE_ENDING",
    "PYTHON_PATH",
    "NODE_EXECUTABLE",
    "NPM_EXECUTABLE",
    "SHELL_EXT",
    "CURRENT_YEAR",
    // project facts
    "PROJECT_NAME",
    "PROJECT_DESCRIPTION",
    "PROJECT_VERSION",
    "PROJECT_KEYWORDS",
    "AUTHOR_NAME",
    "AUTHOR_EMAIL",
];

/// Classification of every token occurrence in one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport {
    pub supported: Vec<String>,
    pub unsupported: Vec<String>,
}

impl TokenReport {
    pub fn is_clean(&self) -> bool {
        self.unsupported.is_empty()
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{([A-Z_]+)\}\}").expect("static pattern"))
}

/// Renders templates by substituting `{{TOKEN}}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Substitute every token in `text`.
    ///
    /// `origin` names the template in error reports; for in-memory inputs
    /// (relative asset paths) it is the asset file the path came from.
    pub fn render_str(
        &self,
        text: &str,
        ctx: &TemplateContext,
        origin: &Path,
    ) -> Result<String> {
        let mut missing: Vec<String> = Vec::new();
        let rendered = token_pattern().replace_all(text, |caps: &regex::Captures<'_>| {
            let token = &caps[1];
            match ctx.get(token) {
                Some(value) => value.to_string(),
                None => {
                    if !missing.iter().any(|m| m == token) {
                        missing.push(token.to_string());
                    }
                    String::new()
                }
            }
        });

        if !missing.is_empty() {
            return Err(Error::template(
                origin,
                format!("unsupported token(s): {}", missing.join(", ")),
            ));
        }
        Ok(rendered.into_owned())
    }

    /// Render `template_path` into `output_path`.
    ///
    /// Parent directories are created as needed. The write goes to a
    /// temporary file in the same directory and is renamed into place, so
    /// a failure leaves either the old file or no file — never a
    /// half-written one. Write failures are service errors tagged with the
    /// calling stage; only reading and substitution problems are template
    /// errors.
    pub fn render(
        &self,
        template_path: &Path,
        output_path: &Path,
        ctx: &TemplateContext,
        stage: Stage,
    ) -> Result<()> {
        let text = fs::read_to_string(template_path).map_err(|e| {
            Error::template(template_path, format!("read failed: {e}"))
        })?;
        let rendered = self.render_str(&text, ctx, template_path)?;

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::service(
                    stage,
                    format!("create parent directory {}: {e}", parent.display()),
                )
            })?;
        }
        write_atomic(output_path, &rendered).map_err(|e| {
            Error::service(stage, format!("write {}: {e}", output_path.display()))
        })?;

        trace!(template = %template_path.display(), output = %output_path.display(), "rendered");
        Ok(())
    }

    /// Scan a template and classify every `{{[A-Z_]+}}` occurrence against
    /// the fixed vocabulary, so callers can fail fast on typos instead of
    /// shipping literal unresolved tokens.
    pub fn validate(&self, template_path: &Path) -> Result<TokenReport> {
        let text = fs::read_to_string(template_path).map_err(|e| {
            Error::template(template_path, format!("read failed: {e}"))
        })?;

        let mut report = TokenReport {
            supported: Vec::new(),
            unsupported: Vec::new(),
        };
        for caps in token_pattern().captures_iter(&text) {
            let token = caps[1].to_string();
            let bucket = if SUPPORTED_TOKENS.contains(&token.as_str()) {
                &mut report.supported
            } else {
                &mut report.unsupported
            };
            if !bucket.contains(&token) {
                bucket.push(token);
            }
        }
        Ok(report)
    }
}

/// Buffer-then-rename write: the target is only ever the old content or the
/// new content, never a torn mix.
fn write_atomic(target: &Path, contents: &str) -> io::Result<()> {
    let file_name = target
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp~");
    let tmp = target.with_file_name(tmp_name);

    fs::write(&tmp, contents)?;
    match fs::rename(&tmp, target) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}
