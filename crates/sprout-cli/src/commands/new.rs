//! Implementation of the `sprout new` command.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use sprout_core::domain::{
    CreationOptions, CreationResult, Language as CoreLanguage, ProjectRequest, Variant,
};

use crate::{
    cli::{GlobalArgs, NewArgs, OutputFormat},
    commands::{build_orchestrator, confirm, resolve_assets_root, resolve_language},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout new` command.
///
/// Dispatch sequence:
/// 1. Parse and validate the project name / destination path
/// 2. Translate CLI args into a core `ProjectRequest`
/// 3. Confirm with the user unless `--yes` / `--quiet` / `--dry-run`
/// 4. Wire adapters and run the creation pipeline
/// 5. Display the result (human or JSON)
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path and language.
    let (project_name, destination) = resolve_project_path(&args.name)?;
    let language = resolve_language(args.language, &config)?;
    let variant = args
        .variant
        .as_deref()
        .map(str::parse::<Variant>)
        .transpose()
        .map_err(CliError::Core)?;

    // 2. Build the validated request.
    let extra_vars = collect_vars(&args.var, &config)?;
    let request = ProjectRequest::new(
        language,
        variant,
        &project_name,
        &destination,
        CreationOptions {
            minimal: args.minimal,
            force: args.force,
            dry_run: args.dry_run,
            extra_vars,
        },
    )
    .map_err(CliError::Core)?;

    debug!(
        %language,
        variant = variant.map(|v| v.to_string()).as_deref().unwrap_or("auto"),
        minimal = args.minimal,
        force = args.force,
        "request built"
    );

    // 3. Show configuration and confirm.
    if !global.quiet && !args.yes && !args.dry_run {
        show_configuration(&request, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 4. Wire adapters and run.
    let assets_root = resolve_assets_root(&global, &config)?;
    let orchestrator = build_orchestrator(assets_root, args.yes);

    info!(project = %project_name, path = %destination.display(), "creation started");
    let result = orchestrator.create(&request).map_err(CliError::Core)?;

    if !result.success {
        // The only non-error unsuccessful outcome is a user cancel.
        if let Some(detail) = &result.error {
            output.warning(detail)?;
        }
        return Err(CliError::Cancelled);
    }

    // 5. Display.
    display_result(&request, &result, &output)?;
    Ok(())
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split a name-or-path argument into (project name, destination path).
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract a project name".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

// ── Template variables ────────────────────────────────────────────────────────

/// Parse `--var KEY=VALUE` pairs and fold in configured author facts for
/// keys the user did not set explicitly.
fn collect_vars(specs: &[String], config: &AppConfig) -> CliResult<IndexMap<String, String>> {
    let mut vars = IndexMap::new();
    for spec in specs {
        let (key, value) = spec.split_once('=').ok_or_else(|| CliError::InvalidInput {
            message: format!("--var needs KEY=VALUE, got '{spec}'"),
        })?;
        if key.is_empty() {
            return Err(CliError::InvalidInput {
                message: format!("--var has an empty key: '{spec}'"),
            });
        }
        vars.insert(key.to_string(), value.to_string());
    }

    if let Some(author) = &config.defaults.author_name {
        vars.entry("AUTHOR_NAME".to_string())
            .or_insert_with(|| author.clone());
    }
    if let Some(email) = &config.defaults.author_email {
        vars.entry("AUTHOR_EMAIL".to_string())
            .or_insert_with(|| email.clone());
    }
    Ok(vars)
}

// ── UI ────────────────────────────────────────────────────────────────────────

fn show_configuration(request: &ProjectRequest, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", request.name()))?;
    out.print(&format!("  Language:  {}", request.language()))?;
    out.print(&format!(
        "  Variant:   {}",
        request
            .variant()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "auto-detect".into())
    ))?;
    out.print(&format!("  Location:  {}", request.destination().display()))?;
    if request.minimal() {
        out.print("  Mode:      minimal (structure and files only)")?;
    }
    out.print("")?;
    Ok(())
}

fn display_result(
    request: &ProjectRequest,
    result: &CreationResult,
    out: &OutputManager,
) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        let payload = serde_json::to_string_pretty(result).map_err(|e| CliError::IoError {
            message: "failed to serialize result".into(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        out.machine(&payload)?;
        return Ok(());
    }

    if result.dry_run {
        out.header(&format!(
            "Dry run: '{}' at {}",
            request.name(),
            request.destination().display()
        ))?;
        out.print(&format!("  Variant:     {}", result.variant))?;
        out.print(&format!(
            "  Would create {} directories and {} files",
            result.created_dirs().len(),
            result.created_files().len()
        ))?;
        let tools = result.configured_tools();
        if !tools.is_empty() {
            out.print(&format!("  Would configure: {}", tools.join(", ")))?;
        }
        return Ok(());
    }

    out.success(&format!(
        "Project '{}' created at {}",
        request.name(),
        request.destination().display()
    ))?;
    out.print(&format!(
        "  {} directories, {} files ({} variant)",
        result.created_dirs().len(),
        result.created_files().len(),
        result.variant
    ))?;
    let tools = result.configured_tools();
    if !tools.is_empty() {
        out.print(&format!("  Configured: {}", tools.join(", ")))?;
    }
    for warning in result.warnings() {
        out.warning(warning)?;
    }

    out.print("")?;
    out.print("Next steps:")?;
    out.print(&format!("  cd {}", request.name()))?;
    match request.language() {
        CoreLanguage::Python => out.print("  . .venv/bin/activate")?,
        CoreLanguage::JavaScript => out.print("  npm start")?,
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_project_path ──────────────────────────────────────────────

    #[test]
    fn simple_name_resolves_to_relative_path() {
        let (name, dest) = resolve_project_path("my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dest, PathBuf::from("my-app"));
    }

    #[test]
    fn relative_path_keeps_full_destination() {
        let (name, dest) = resolve_project_path("../my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dest, PathBuf::from("../my-app"));
    }

    #[test]
    fn nested_path_works() {
        let sep = std::path::MAIN_SEPARATOR;
        let input = format!("foo{sep}bar{sep}my-app");
        let (name, dest) = resolve_project_path(&input).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dest, PathBuf::from("foo").join("bar").join("my-app"));
    }

    #[test]
    fn trailing_dots_are_rejected() {
        assert!(resolve_project_path("..").is_err());
    }

    // ── collect_vars ──────────────────────────────────────────────────────

    #[test]
    fn key_value_pairs_are_parsed_in_order() {
        let vars = collect_vars(
            &["A=1".into(), "B=x=y".into()],
            &AppConfig::default(),
        )
        .unwrap();
        assert_eq!(vars.get("A").map(String::as_str), Some("1"));
        // Only the first '=' splits.
        assert_eq!(vars.get("B").map(String::as_str), Some("x=y"));
    }

    #[test]
    fn malformed_var_is_invalid_input() {
        let err = collect_vars(&["NOEQUALS".into()], &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
        let err = collect_vars(&["=value".into()], &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }

    #[test]
    fn configured_author_fills_missing_vars() {
        let mut config = AppConfig::default();
        config.defaults.author_name = Some("Ada Lovelace".into());
        config.defaults.author_email = Some("ada@example.com".into());

        let vars = collect_vars(&[], &config).unwrap();
        assert_eq!(vars.get("AUTHOR_NAME").map(String::as_str), Some("Ada Lovelace"));
        assert_eq!(
            vars.get("AUTHOR_EMAIL").map(String::as_str),
            Some("ada@example.com")
        );
    }

    #[test]
    fn explicit_var_beats_configured_author() {
        let mut config = AppConfig::default();
        config.defaults.author_name = Some("Config Author".into());
        let vars = collect_vars(&["AUTHOR_NAME=Flag Author".into()], &config).unwrap();
        assert_eq!(vars.get("AUTHOR_NAME").map(String::as_str), Some("Flag Author"));
    }
}
