//! Implementation of the `sprout setup` command.
//!
//! Configures an existing project: runtime environment, dependencies and
//! dev tooling. Nothing structural is created or deleted.

use std::io;

use tracing::{info, instrument};

use sprout_core::domain::SetupResult;

use crate::{
    cli::{GlobalArgs, OutputFormat, SetupArgs},
    commands::{build_orchestrator, resolve_assets_root, resolve_language},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout setup` command.
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: SetupArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let language = resolve_language(args.language, &config)?;

    let assets_root = resolve_assets_root(&global, &config)?;
    let orchestrator = build_orchestrator(assets_root, args.yes);

    info!(%language, "setup started");
    let result = orchestrator
        .setup(&args.path, language, args.force)
        .map_err(CliError::Core)?;

    if !result.success {
        if let Some(detail) = &result.error {
            output.warning(detail)?;
        }
        return Err(CliError::Cancelled);
    }

    display_result(&args, &result, &output)?;
    Ok(())
}

fn display_result(args: &SetupArgs, result: &SetupResult, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        let payload = serde_json::to_string_pretty(result).map_err(|e| CliError::IoError {
            message: "failed to serialize result".into(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        out.machine(&payload)?;
        return Ok(());
    }

    out.success(&format!(
        "Project at {} configured ({} variant)",
        args.path.display(),
        result.variant
    ))?;
    if !result.configured_tools.is_empty() {
        out.print(&format!("  Configured: {}", result.configured_tools.join(", ")))?;
    }
    for warning in &result.warnings {
        out.warning(warning)?;
    }
    Ok(())
}
