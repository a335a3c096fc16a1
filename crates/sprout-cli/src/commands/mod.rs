//! Command handlers and the helpers they share.
//!
//! Each handler translates CLI arguments into core types, wires the
//! adapters, calls the orchestrator and displays results. No business
//! logic lives here.

pub mod completions;
pub mod list;
pub mod new;
pub mod setup;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use sprout_adapters::{
    InteractivePrompter, ScriptedDecisions, SystemCommandRunner, SystemToolProbe,
};
use sprout_core::application::{AssetResolver, CreationOrchestrator, ports::DecisionProvider};
use sprout_core::domain::{ConflictDecision, Language as CoreLanguage};

use crate::{
    cli::{GlobalArgs, Language},
    config::AppConfig,
    error::{CliError, CliResult},
};

// ── language resolution ───────────────────────────────────────────────────────

/// CLI flag wins, then the configured default; no silent fallback beyond
/// that.
pub(crate) fn resolve_language(
    arg: Option<Language>,
    config: &AppConfig,
) -> CliResult<CoreLanguage> {
    if let Some(language) = arg {
        return Ok(convert_language(language));
    }
    if let Some(configured) = &config.defaults.language {
        return configured.parse::<CoreLanguage>().map_err(CliError::Core);
    }
    Err(CliError::InvalidInput {
        message: "no language given; pass --lang or set defaults.language in the config".into(),
    })
}

pub(crate) fn convert_language(language: Language) -> CoreLanguage {
    match language {
        Language::Python => CoreLanguage::Python,
        Language::JavaScript => CoreLanguage::JavaScript,
    }
}

// ── asset root resolution ─────────────────────────────────────────────────────

/// Find the bundled asset tree: `--assets`/`SPROUT_ASSETS`, then the
/// config file, then the installed layout next to the executable, then
/// the in-repo tree (development builds).
pub(crate) fn resolve_assets_root(
    global: &GlobalArgs,
    config: &AppConfig,
) -> CliResult<PathBuf> {
    let mut searched = Vec::new();
    let candidates = [
        global.assets.clone(),
        config.templates.root.clone(),
        exe_relative_assets(),
        Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets")),
    ];
    for candidate in candidates.into_iter().flatten() {
        if candidate.join("languages").is_dir() {
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }
    Err(CliError::AssetsNotFound { searched })
}

fn exe_relative_assets() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("../share/sprout/assets"))
}

// ── orchestrator wiring ───────────────────────────────────────────────────────

/// Interactive prompts on a terminal; scripted safe answers (Skip) when
/// the user asked for non-interactive mode or stdin is not a TTY.
pub(crate) fn decision_provider(non_interactive: bool) -> Box<dyn DecisionProvider> {
    if non_interactive || !std::io::stdin().is_terminal() {
        Box::new(ScriptedDecisions::always(ConflictDecision::Skip))
    } else {
        Box::new(InteractivePrompter::new())
    }
}

pub(crate) fn build_orchestrator(
    assets_root: PathBuf,
    non_interactive: bool,
) -> CreationOrchestrator {
    CreationOrchestrator::new(
        AssetResolver::new(assets_root),
        decision_provider(non_interactive),
        Box::new(SystemToolProbe::new()),
        Box::new(SystemCommandRunner::new()),
    )
}

// ── confirmation ──────────────────────────────────────────────────────────────

pub(crate) fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── tests ─────────────────────────────────────────────────────────────────────
