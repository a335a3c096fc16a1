//! Creation orchestrator - sequences the pipeline stages.
//!
//! Fixed stage order per request: validate → detect/validate variant →
//! structure → files → environment → dependencies → tooling → VCS init.
//! The first four are load-bearing: a failure there aborts with a
//! stage-tagged service error carrying the partial artifact lists. The
//! last four are best-effort: a missing global tool must not prevent
//! delivering usable project files, so their failures degrade to warnings.
//!
//! All collaborators are injected at construction; the orchestrator owns
//! no hidden global state.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::application::{
    assets::{AssetLocation, AssetResolver, AssetType},
    conflict::ConflictResolver,
    detector::VariantDetector,
    ports::{CommandRunner, DecisionProvider, ToolProbe},
    template::TemplateEngine,
};
use crate::domain::{
    ConflictDecision, CreationResult, Language, ProjectRequest, SetupResult, Stage, StageOutcome,
    TemplateContext, Variant,
};
use crate::error::{Error, Result};

/// Timeout for quick tool invocations (venv creation, git init).
const TOOL_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for package installation, which legitimately takes a while.
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Outcome of a conflict-gated multi-write helper: either the stage ran
/// through, or the user cancelled at a specific path and the whole
/// operation must stop.
enum Flow {
    Continue,
    Cancelled(PathBuf),
}

/// Sequences structure → files → environment → dependencies → tooling →
/// VCS per project request, aggregating a [`CreationResult`].
pub struct CreationOrchestrator {
    assets: AssetResolver,
    detector: VariantDetector,
    engine: TemplateEngine,
    conflicts: ConflictResolver,
    decisions: Box<dyn DecisionProvider>,
    probe: Box<dyn ToolProbe>,
    runner: Box<dyn CommandRunner>,
}

impl CreationOrchestrator {
    pub fn new(
        assets: AssetResolver,
        decisions: Box<dyn DecisionProvider>,
        probe: Box<dyn ToolProbe>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            assets,
            detector: VariantDetector::new(),
            engine: TemplateEngine::new(),
            conflicts: ConflictResolver::new(),
            decisions,
            probe,
            runner,
        }
    }

    /// Create a project. Consumes the request conceptually: the result is
    /// the only durable output.
    #[instrument(skip_all, fields(project = %request.name(), language = %request.language()))]
    pub fn create(&self, request: &ProjectRequest) -> Result<CreationResult> {
        self.validate_destination(request)?;

        let variant = match request.variant() {
            Some(variant) => variant,
            None => self
                .detector
                .detect(request.destination(), request.language()),
        };
        info!(%variant, dry_run = request.dry_run(), "creation started");

        let ctx = self.build_context(request.name(), request.extra_vars());
        let mut result = CreationResult::new(variant, request.dry_run());
        result.push(StageOutcome::new(Stage::Validate));
        result.push(StageOutcome::new(Stage::Variant));

        // ── structure ─────────────────────────────────────────────────────
        let flow = self.create_structure(request, variant, &ctx, result.begin(Stage::Structure));
        match flow {
            Ok(Flow::Continue) => {}
            Ok(Flow::Cancelled(path)) => {
                result.cancel(&path);
                return Ok(result);
            }
            Err(e) => return Err(attach_partials(e, &result)),
        }

        // ── files ─────────────────────────────────────────────────────────
        let flow = self.materialize_scaffold(request, variant, &ctx, result.begin(Stage::Files));
        match flow {
            Ok(Flow::Continue) => {}
            Ok(Flow::Cancelled(path)) => {
                result.cancel(&path);
                return Ok(result);
            }
            Err(e) => return Err(attach_partials(e, &result)),
        }

        // ── environment / dependencies / tooling / vcs ────────────────────
        if request.minimal() {
            for stage in [
                Stage::Environment,
                Stage::Dependencies,
                Stage::Tooling,
                Stage::Vcs,
            ] {
                result.push(StageOutcome::skipped(stage));
            }
        } else {
            let dest = request.destination();
            let dry_run = request.dry_run();

            self.init_environment(
                dest,
                request.language(),
                &ctx,
                dry_run,
                result.begin(Stage::Environment),
            );

            let flow = self.install_dependencies(
                dest,
                request.language(),
                variant,
                &ctx,
                request.force(),
                dry_run,
                result.begin(Stage::Dependencies),
            );
            if let Flow::Cancelled(path) = flow {
                result.cancel(&path);
                return Ok(result);
            }

            let flow = self.configure_tooling(
                dest,
                request.language(),
                variant,
                &ctx,
                request.force(),
                dry_run,
                result.begin(Stage::Tooling),
            );
            if let Flow::Cancelled(path) = flow {
                result.cancel(&path);
                return Ok(result);
            }

            self.init_vcs(dest, dry_run, result.begin(Stage::Vcs));
        }

        result.success = true;
        info!(
            files = result.created_files().len(),
            warnings = result.warnings().len(),
            "creation finished"
        );
        Ok(result)
    }

    /// Configure an existing project: environment, dependencies and
    /// tooling only — nothing structural is touched.
    #[instrument(skip_all, fields(root = %root.display(), %language))]
    pub fn setup(&self, root: &Path, language: Language, force: bool) -> Result<SetupResult> {
        if !root.is_dir() {
            return Err(Error::validation(format!(
                "{} is not an existing directory",
                root.display()
            )));
        }
        let name = project_name_of(root)?;
        let variant = self.detector.detect(root, language);
        info!(%variant, "setup started");

        let ctx = self.build_context(&name, &Default::default());

        let mut env = StageOutcome::new(Stage::Environment);
        self.init_environment(root, language, &ctx, false, &mut env);

        let mut deps = StageOutcome::new(Stage::Dependencies);
        let deps_flow =
            self.install_dependencies(root, language, variant, &ctx, force, false, &mut deps);

        let mut tooling = StageOutcome::new(Stage::Tooling);
        let tooling_flow = match &deps_flow {
            Flow::Cancelled(_) => Flow::Continue,
            Flow::Continue => {
                self.configure_tooling(root, language, variant, &ctx, force, false, &mut tooling)
            }
        };

        let cancelled_at = match (deps_flow, tooling_flow) {
            (Flow::Cancelled(path), _) | (_, Flow::Cancelled(path)) => Some(path),
            _ => None,
        };

        let outcomes = [env, deps, tooling];
        Ok(SetupResult {
            success: cancelled_at.is_none(),
            variant,
            configured_tools: outcomes
                .iter()
                .flat_map(|o| o.tools.iter().cloned())
                .collect(),
            warnings: outcomes
                .iter()
                .flat_map(|o| o.warnings.iter().cloned())
                .collect(),
            error: cancelled_at.map(|p| format!("cancelled by user at {}", p.display())),
        })
    }

    // ── validate ─────────────────────────────────────────────────────────────

    /// Destination-state rules, checked before any side effect.
    fn validate_destination(&self, request: &ProjectRequest) -> Result<()> {
        let dest = request.destination();
        if dest.is_file() {
            return Err(Error::validation(format!(
                "destination {} is an existing file",
                dest.display()
            )));
        }
        if dest.is_dir() && !request.force() {
            let mut entries = fs::read_dir(dest).map_err(|e| {
                Error::service(
                    Stage::Validate,
                    format!("inspect destination {}: {e}", dest.display()),
                )
            })?;
            if entries.next().is_some() {
                return Err(Error::validation(format!(
                    "destination {} exists and is not empty (use force to merge into it)",
                    dest.display()
                )));
            }
        }
        Ok(())
    }

    // ── context ──────────────────────────────────────────────────────────────

    /// Platform facts, then project facts, then caller variables — later
    /// writers win.
    fn build_context(
        &self,
        name: &str,
        extra_vars: &indexmap::IndexMap<String, String>,
    ) -> TemplateContext {
        let mut ctx = TemplateContext::from_platform();
        ctx.set("PROJECT_NAME", name);
        ctx.set("PROJECT_DESCRIPTION", format!("The {name} project"));
        ctx.set("PROJECT_VERSION", "0.1.0");
        ctx.set("PROJECT_KEYWORDS", "");
        ctx.set("AUTHOR_NAME", "Your Name");
        ctx.set("AUTHOR_EMAIL", "you@example.com");
        ctx.merge(extra_vars);
        ctx
    }

    // ── structure ────────────────────────────────────────────────────────────

    fn create_structure(
        &self,
        request: &ProjectRequest,
        variant: Variant,
        ctx: &TemplateContext,
        out: &mut StageOutcome,
    ) -> Result<Flow> {
        let dest = request.destination();

        if request.dry_run() {
            out.set_planned();
            out.record_dir(dest.to_path_buf());
            for rel in structure_dirs(variant) {
                let rendered = self.engine.render_str(rel, ctx, Path::new(rel))?;
                out.record_dir(dest.join(rendered));
            }
            return Ok(Flow::Continue);
        }

        if !dest.exists() {
            fs::create_dir_all(dest).map_err(|e| {
                Error::service(
                    Stage::Structure,
                    format!("create project root {}: {e}", dest.display()),
                )
            })?;
            out.record_dir(dest.to_path_buf());
        }

        for rel in structure_dirs(variant) {
            let rendered = self.engine.render_str(rel, ctx, Path::new(rel))?;
            let target = dest.join(rendered);
            match self.ensure_dir(&target, request.force(), Stage::Structure, out)? {
                Flow::Continue => {}
                cancelled => return Ok(cancelled),
            }
        }
        Ok(Flow::Continue)
    }

    /// Conflict-gated directory creation.
    fn ensure_dir(
        &self,
        target: &Path,
        force: bool,
        stage: Stage,
        out: &mut StageOutcome,
    ) -> Result<Flow> {
        let decision =
            self.conflicts
                .resolve(target, true, force, self.decisions.as_ref(), stage)?;
        match decision {
            ConflictDecision::Cancel => return Ok(Flow::Cancelled(target.to_path_buf())),
            ConflictDecision::Skip | ConflictDecision::Merge => {
                if target.exists() {
                    debug!(target = %target.display(), %decision, "keeping existing directory");
                    return Ok(Flow::Continue);
                }
            }
            ConflictDecision::Overwrite => {
                if target.is_dir() {
                    fs::remove_dir_all(target).map_err(|e| {
                        Error::service(
                            stage,
                            format!("replace directory {}: {e}", target.display()),
                        )
                    })?;
                }
            }
        }
        fs::create_dir_all(target).map_err(|e| {
            Error::service(stage, format!("create directory {}: {e}", target.display()))
        })?;
        out.record_dir(target.to_path_buf());
        Ok(Flow::Continue)
    }

    // ── files ────────────────────────────────────────────────────────────────

    fn materialize_scaffold(
        &self,
        request: &ProjectRequest,
        variant: Variant,
        ctx: &TemplateContext,
        out: &mut StageOutcome,
    ) -> Result<Flow> {
        let asset = self
            .assets
            .resolve(request.language(), variant, AssetType::Scaffold)?;
        if request.dry_run() {
            out.set_planned();
        }
        self.materialize_asset(
            &asset,
            request.destination(),
            ctx,
            request.force(),
            request.dry_run(),
            Stage::Files,
            out,
        )
    }

    /// Walk one asset directory and materialize every entry under `dest`,
    /// expanding `{{TOKEN}}`s in both relative paths and file contents.
    /// Every write to an existing target is conflict-gated; Cancel stops
    /// the walk immediately.
    fn materialize_asset(
        &self,
        asset: &AssetLocation,
        dest: &Path,
        ctx: &TemplateContext,
        force: bool,
        dry_run: bool,
        stage: Stage,
        out: &mut StageOutcome,
    ) -> Result<Flow> {
        // Deterministic walk order keeps results and prompts stable.
        for entry in WalkDir::new(&asset.path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::service(stage, format!("walk asset {}: {e}", asset.path.display()))
            })?;
            let rel = entry
                .path()
                .strip_prefix(&asset.path)
                .map_err(|e| Error::service(stage, format!("asset path prefix: {e}")))?;
            if rel.as_os_str().is_empty() {
                continue;
            }
            let rel_str = rel.to_str().ok_or_else(|| {
                Error::service(stage, format!("non-UTF-8 asset path: {}", rel.display()))
            })?;
            let rendered_rel = self.engine.render_str(rel_str, ctx, entry.path())?;
            let target = dest.join(&rendered_rel);

            if entry.file_type().is_dir() {
                if dry_run {
                    out.record_dir(target);
                    continue;
                }
                // An existing directory is the merge case, not a conflict:
                // union with incoming, collisions decided file by file.
                if !target.exists() {
                    fs::create_dir_all(&target).map_err(|e| {
                        Error::service(
                            stage,
                            format!("create directory {}: {e}", target.display()),
                        )
                    })?;
                    out.record_dir(target);
                }
                continue;
            }

            if dry_run {
                // Nothing is written, but typos in the template vocabulary
                // should still surface now rather than on the real run.
                match self.engine.validate(entry.path()) {
                    Ok(report) if !report.is_clean() => out.warn(format!(
                        "template {} uses unsupported token(s): {}",
                        entry.path().display(),
                        report.unsupported.join(", ")
                    )),
                    Ok(_) => {}
                    Err(e) => out.warn(format!("template not readable: {e}")),
                }
                out.record_file(target);
                continue;
            }
            let decision =
                self.conflicts
                    .resolve(&target, false, force, self.decisions.as_ref(), stage)?;
            match decision {
                ConflictDecision::Cancel => return Ok(Flow::Cancelled(target)),
                ConflictDecision::Skip => {
                    debug!(target = %target.display(), "left existing file untouched");
                }
                // On a file, merge means the incoming side wins.
                ConflictDecision::Overwrite | ConflictDecision::Merge => {
                    self.engine.render(entry.path(), &target, ctx, stage)?;
                    out.record_file(target);
                }
            }
        }
        Ok(Flow::Continue)
    }

    // ── environment ──────────────────────────────────────────────────────────

    fn init_environment(
        &self,
        dest: &Path,
        language: Language,
        ctx: &TemplateContext,
        dry_run: bool,
        out: &mut StageOutcome,
    ) {
        if dry_run {
            out.set_planned();
            if language == Language::Python {
                out.record_tool("venv");
            }
            return;
        }

        match language {
            Language::Python => {
                let python = ctx.get("PYTHON_PATH").unwrap_or("python3");
                let status = self.probe.check_available(python);
                if !status.available {
                    out.warn(format!(
                        "{python} not found on PATH; skipped virtual environment creation"
                    ));
                    return;
                }
                match self
                    .runner
                    .run(&[python, "-m", "venv", ".venv"], dest, TOOL_TIMEOUT)
                {
                    Ok(output) if output.success() => {
                        info!("virtual environment created");
                        out.record_tool("venv");
                    }
                    Ok(output) => out.warn(format!(
                        "virtual environment creation failed: {}",
                        output.stderr.trim()
                    )),
                    Err(e) => out.warn(format!("virtual environment creation did not finish: {e}")),
                }
            }
            Language::JavaScript => {
                let node = ctx.get("NODE_EXECUTABLE").unwrap_or("node");
                let status = self.probe.check_available(node);
                if status.available {
                    debug!(version = status.version.as_deref().unwrap_or("unknown"), "node present");
                } else {
                    out.warn("node not found on PATH; the project will not run until it is installed");
                }
            }
        }
    }

    // ── dependencies ─────────────────────────────────────────────────────────

    fn install_dependencies(
        &self,
        dest: &Path,
        language: Language,
        variant: Variant,
        ctx: &TemplateContext,
        force: bool,
        dry_run: bool,
        out: &mut StageOutcome,
    ) -> Flow {
        if dry_run {
            out.set_planned();
        }

        // Python variants carry a requirements asset; materialize it first
        // so the project is usable even when pip is unavailable.
        if self.assets.has(language, variant, AssetType::Requirements) {
            let asset = match self
                .assets
                .resolve(language, variant, AssetType::Requirements)
            {
                Ok(asset) => asset,
                Err(e) => {
                    out.warn(format!("dependency manifests unavailable: {e}"));
                    return Flow::Continue;
                }
            };
            match self.materialize_asset(&asset, dest, ctx, force, dry_run, Stage::Dependencies, out)
            {
                Ok(Flow::Continue) => {}
                Ok(cancelled @ Flow::Cancelled(_)) => return cancelled,
                Err(e) => {
                    out.warn(format!("dependency manifests not written: {e}"));
                    return Flow::Continue;
                }
            }
        }

        match language {
            Language::Python => {
                if dry_run {
                    out.record_tool("pip");
                    return Flow::Continue;
                }
                let pip = venv_pip(dest);
                if !pip.exists() {
                    out.warn("virtual environment missing; run pip install manually");
                    return Flow::Continue;
                }
                let pip = pip.to_string_lossy().into_owned();
                match self.runner.run(
                    &[pip.as_str(), "install", "-r", "requirements.txt"],
                    dest,
                    INSTALL_TIMEOUT,
                ) {
                    Ok(output) if output.success() => {
                        info!("python dependencies installed");
                        out.record_tool("pip");
                    }
                    Ok(output) => out.warn(format!(
                        "pip install failed: {}",
                        output.stderr.trim()
                    )),
                    Err(e) => out.warn(format!("pip install did not finish: {e}")),
                }
            }
            Language::JavaScript => {
                if dry_run {
                    out.record_tool("npm");
                    return Flow::Continue;
                }
                let npm = ctx.get("NPM_EXECUTABLE").unwrap_or("npm");
                if !self.probe.check_available(npm).available {
                    out.warn(format!("{npm} not found on PATH; run npm install manually"));
                    return Flow::Continue;
                }
                match self.runner.run(&[npm, "install"], dest, INSTALL_TIMEOUT) {
                    Ok(output) if output.success() => {
                        info!("npm dependencies installed");
                        out.record_tool("npm");
                    }
                    Ok(output) => {
                        out.warn(format!("npm install failed: {}", output.stderr.trim()))
                    }
                    Err(e) => out.warn(format!("npm install did not finish: {e}")),
                }
            }
        }
        Flow::Continue
    }

    // ── tooling ──────────────────────────────────────────────────────────────

    fn configure_tooling(
        &self,
        dest: &Path,
        language: Language,
        variant: Variant,
        ctx: &TemplateContext,
        force: bool,
        dry_run: bool,
        out: &mut StageOutcome,
    ) -> Flow {
        if dry_run {
            out.set_planned();
        }

        let asset = match self.assets.resolve(language, variant, AssetType::Tooling) {
            Ok(asset) => asset,
            Err(e) => {
                out.warn(format!("tooling configuration unavailable: {e}"));
                return Flow::Continue;
            }
        };
        match self.materialize_asset(&asset, dest, ctx, force, dry_run, Stage::Tooling, out) {
            Ok(Flow::Continue) => {}
            Ok(cancelled @ Flow::Cancelled(_)) => return cancelled,
            Err(e) => {
                out.warn(format!("tooling configuration not written: {e}"));
                return Flow::Continue;
            }
        }

        let tools: Vec<&'static str> = out
            .files
            .iter()
            .filter_map(|path| tool_for_file(path))
            .collect();
        for tool in tools {
            out.record_tool(tool);
        }
        Flow::Continue
    }

    // ── vcs ──────────────────────────────────────────────────────────────────

    fn init_vcs(&self, dest: &Path, dry_run: bool, out: &mut StageOutcome) {
        if dry_run {
            out.set_planned();
            out.record_tool("git");
            return;
        }
        if dest.join(".git").exists() {
            debug!("destination is already a git repository");
            return;
        }
        if !self.probe.check_available("git").available {
            out.warn("git not found on PATH; repository not initialised");
            return;
        }
        match self.runner.run(&["git", "init"], dest, TOOL_TIMEOUT) {
            Ok(output) if output.success() => {
                info!("git repository initialised");
                out.record_tool("git");
            }
            Ok(output) => out.warn(format!("git init failed: {}", output.stderr.trim())),
            Err(e) => out.warn(format!("git init did not finish: {e}")),
        }
    }
}

/// Directory skeleton per variant, created before file materialization.
/// Entries may contain `{{TOKEN}}`s, expanded with the request context.
fn structure_dirs(variant: Variant) -> &'static [&'static str] {
    match variant {
        Variant::Py | Variant::Django => &["src", "src/{{PROJECT_NAME}}", "tests"],
        Variant::Js | Variant::Node | Variant::Ts => &["src", "tests"],
        Variant::React | Variant::ReactTs | Variant::Vue | Variant::VueTs => &["src", "public"],
    }
}

/// Configured-tool name for a tooling file, if the file maps to one.
fn tool_for_file(path: &Path) -> Option<&'static str> {
    match path.file_name()?.to_str()? {
        ".editorconfig" => Some("editorconfig"),
        "ruff.toml" => Some("ruff"),
        ".eslintrc.json" => Some("eslint"),
        _ => None,
    }
}

/// Path of the venv pip executable for a project root.
fn venv_pip(dest: &Path) -> PathBuf {
    if cfg!(windows) {
        dest.join(".venv").join("Scripts").join("pip.exe")
    } else {
        dest.join(".venv").join("bin").join("pip")
    }
}

fn project_name_of(root: &Path) -> Result<String> {
    let canonical = fs::canonicalize(root).map_err(|e| {
        Error::service(
            Stage::Validate,
            format!("canonicalize {}: {e}", root.display()),
        )
    })?;
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::validation(format!(
                "cannot derive a project name from {}",
                root.display()
            ))
        })
}

fn attach_partials(e: Error, result: &CreationResult) -> Error {
    let files: Vec<PathBuf> = result
        .created_files()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    let dirs: Vec<PathBuf> = result
        .created_dirs()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    if !files.is_empty() || !dirs.is_empty() {
        warn!(
            files = files.len(),
            dirs = dirs.len(),
            "pipeline aborted with partial artifacts"
        );
    }
    e.with_partial(&files, &dirs)
}
