//! Integration tests for the creation pipeline against the bundled asset
//! tree. External collaborators (decisions, probes, command running) are
//! replaced with canned implementations so no real processes are spawned.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sprout_core::application::{
    AssetResolver, CreationOrchestrator,
    ports::{CommandOutput, CommandRunner, DecisionProvider, ToolProbe, ToolStatus},
};
use sprout_core::domain::{
    ConflictDecision, CreationOptions, Language, ProjectRequest, Stage, StageStatus, Variant,
};
use sprout_core::error::Error;

// ── canned collaborators ─────────────────────────────────────────────────────

/// Answers conflicts from a fixed queue, then falls back to a default.
struct CannedDecisions {
    queue: Mutex<VecDeque<ConflictDecision>>,
    fallback: ConflictDecision,
}

impl CannedDecisions {
    fn always(fallback: ConflictDecision) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
        }
    }

    fn script(decisions: Vec<ConflictDecision>, fallback: ConflictDecision) -> Self {
        Self {
            queue: Mutex::new(decisions.into()),
            fallback,
        }
    }
}

impl DecisionProvider for CannedDecisions {
    fn decide_conflict(&self, _target: &Path, _is_dir: bool) -> io::Result<ConflictDecision> {
        let mut queue = self.queue.lock().unwrap();
        Ok(queue.pop_front().unwrap_or(self.fallback))
    }

    fn confirm(&self, _question: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Reports every tool as present.
struct AllToolsPresent;

impl ToolProbe for AllToolsPresent {
    fn check_available(&self, _name: &str) -> ToolStatus {
        ToolStatus::found(Some("0.0.0-test".into()))
    }
}

/// Reports every tool as missing.
struct NoToolsPresent;

impl ToolProbe for NoToolsPresent {
    fn check_available(&self, _name: &str) -> ToolStatus {
        ToolStatus::missing()
    }
}

/// Records invocations and succeeds without spawning anything. Clones
/// share the same log so a test can keep a handle after handing the
/// runner to the orchestrator.
#[derive(Clone)]
struct RecordingRunner {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingRunner {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn commands(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, argv: &[&str], _cwd: &Path, _timeout: Duration) -> io::Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(argv.iter().map(|s| s.to_string()).collect());
        Ok(CommandOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn assets_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

fn orchestrator(decisions: Box<dyn DecisionProvider>) -> CreationOrchestrator {
    CreationOrchestrator::new(
        AssetResolver::new(assets_root()),
        decisions,
        Box::new(NoToolsPresent),
        Box::new(RecordingRunner::new()),
    )
}

fn request(
    language: Language,
    variant: Option<Variant>,
    name: &str,
    dest: &Path,
    options: CreationOptions,
) -> ProjectRequest {
    ProjectRequest::new(language, variant, name, dest, options).unwrap()
}

fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}

// ── scenarios ────────────────────────────────────────────────────────────────

#[test]
fn python_minimal_project_has_source_layout_and_no_requirements() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    let req = request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions {
            minimal: true,
            ..Default::default()
        },
    );

    let result = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)))
        .create(&req)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.variant, Variant::Py);
    assert!(dest.join("pyproject.toml").is_file());
    assert!(dest.join("src/demo/__init__.py").is_file());
    assert!(dest.join("src/demo/main.py").is_file());

    let files = relative_files(&dest);
    assert!(
        !files.iter().any(|f| f.contains("requirements")),
        "minimal run wrote requirements files: {files:?}"
    );
    for stage in [Stage::Environment, Stage::Dependencies, Stage::Tooling, Stage::Vcs] {
        assert_eq!(result.stage(stage).unwrap().status, StageStatus::Skipped);
    }
}

#[test]
fn rendered_output_contains_no_unresolved_tokens() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    let req = request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions {
            minimal: true,
            ..Default::default()
        },
    );
    orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)))
        .create(&req)
        .unwrap();

    let token = regex::Regex::new(r"\{\{[A-Z_]+\}\}").unwrap();
    for file in relative_files(&dest) {
        let text = fs::read_to_string(dest.join(&file)).unwrap();
        assert!(!token.is_match(&text), "unresolved token in {file}");
    }
}

#[test]
fn javascript_react_project_has_react_dependencies_and_entry_files() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    let req = request(
        Language::JavaScript,
        Some(Variant::React),
        "demo",
        &dest,
        CreationOptions {
            minimal: true,
            ..Default::default()
        },
    );
    let result = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)))
        .create(&req)
        .unwrap();

    assert!(result.success);
    let package = fs::read_to_string(dest.join("package.json")).unwrap();
    assert!(package.contains("\"react\""));
    assert!(package.contains("\"react-dom\""));
    assert!(package.contains("\"name\": \"demo\""));
    assert!(dest.join("src/App.jsx").is_file());
    assert!(dest.join("src/index.jsx").is_file());
    assert!(dest.join("public/index.html").is_file());
}

#[test]
fn minimal_and_full_runs_produce_identical_structure_and_files() {
    let tmp = tempfile::TempDir::new().unwrap();

    let minimal_dest = tmp.path().join("minimal/demo");
    let full_dest = tmp.path().join("full/demo");

    let minimal_req = request(
        Language::Python,
        None,
        "demo",
        &minimal_dest,
        CreationOptions {
            minimal: true,
            ..Default::default()
        },
    );
    let full_req = request(
        Language::Python,
        None,
        "demo",
        &full_dest,
        CreationOptions::default(),
    );

    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)));
    let minimal_result = orch.create(&minimal_req).unwrap();
    let full_result = orch.create(&full_req).unwrap();

    // The structure and files stages are byte-for-byte identical; later
    // stages only add artifacts of their own.
    for stage in [Stage::Structure, Stage::Files] {
        let minimal_stage = minimal_result.stage(stage).unwrap();
        let full_stage = full_result.stage(stage).unwrap();
        let strip = |paths: &[PathBuf], root: &Path| -> Vec<PathBuf> {
            paths
                .iter()
                .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
                .collect()
        };
        assert_eq!(
            strip(&minimal_stage.files, &minimal_dest),
            strip(&full_stage.files, &full_dest)
        );
        assert_eq!(
            strip(&minimal_stage.dirs, &minimal_dest),
            strip(&full_stage.dirs, &full_dest)
        );
    }

    for stage in [Stage::Structure, Stage::Files] {
        for file in &full_result.stage(stage).unwrap().files {
            let rel = file.strip_prefix(&full_dest).unwrap();
            assert_eq!(
                fs::read(file).unwrap(),
                fs::read(minimal_dest.join(rel)).unwrap(),
                "content differs for {}",
                rel.display()
            );
        }
    }
}

#[test]
fn non_empty_destination_without_force_fails_before_any_write() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    fs::create_dir_all(&dest).unwrap();
    fs::write(dest.join("precious.txt"), "keep me").unwrap();

    let req = request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions::default(),
    );
    let err = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Overwrite)))
        .create(&req)
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    // Nothing was touched.
    assert_eq!(relative_files(&dest), vec!["precious.txt"]);
}

#[test]
fn force_into_existing_directory_merges_instead_of_destroying() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    fs::create_dir_all(dest.join("src")).unwrap();
    fs::write(dest.join("unrelated.txt"), "keep me").unwrap();
    fs::write(dest.join("README.md"), "old readme").unwrap();

    let req = request(
        Language::JavaScript,
        Some(Variant::Js),
        "demo",
        &dest,
        CreationOptions {
            minimal: true,
            force: true,
            ..Default::default()
        },
    );
    let result = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)))
        .create(&req)
        .unwrap();
    assert!(result.success);

    // Union: pre-existing files survive, incoming wins on collision.
    assert_eq!(fs::read_to_string(dest.join("unrelated.txt")).unwrap(), "keep me");
    let readme = fs::read_to_string(dest.join("README.md")).unwrap();
    assert!(readme.contains("# demo"), "incoming README should win");
    assert!(dest.join("src/index.js").is_file());
}

#[test]
fn dry_run_writes_nothing_but_reports_the_plan() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");

    let req = request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions {
            dry_run: true,
            ..Default::default()
        },
    );
    let runner = RecordingRunner::new();
    let recorder = runner.clone();
    let orch = CreationOrchestrator::new(
        AssetResolver::new(assets_root()),
        Box::new(CannedDecisions::always(ConflictDecision::Cancel)),
        Box::new(AllToolsPresent),
        Box::new(runner),
    );
    let result = orch.create(&req).unwrap();

    assert!(result.success);
    assert!(result.dry_run);
    assert!(!dest.exists(), "dry run must not touch the filesystem");
    assert!(recorder.commands().is_empty(), "dry run must not spawn processes");

    // Same shape as a real run: the plan names the real artifacts.
    let planned: Vec<String> = result
        .created_files()
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    assert!(planned.iter().any(|p| p.ends_with("pyproject.toml")));
    assert!(planned.iter().any(|p| p.ends_with("requirements.txt")));
    for stage in [Stage::Structure, Stage::Files, Stage::Environment] {
        assert_eq!(result.stage(stage).unwrap().status, StageStatus::Planned);
    }
}

#[test]
fn full_run_with_tools_present_invokes_venv_pip_and_git() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");

    // The runner records instead of spawning, so fabricate the pip binary
    // the dependencies stage looks for after "venv creation". The fake
    // venv makes the destination non-empty, hence force.
    let pip_dir = if cfg!(windows) {
        dest.join(".venv/Scripts")
    } else {
        dest.join(".venv/bin")
    };
    fs::create_dir_all(&pip_dir).unwrap();
    fs::write(pip_dir.join(if cfg!(windows) { "pip.exe" } else { "pip" }), "").unwrap();

    let req = request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions {
            force: true,
            ..Default::default()
        },
    );

    let runner = RecordingRunner::new();
    let recorder = runner.clone();
    let orch = CreationOrchestrator::new(
        AssetResolver::new(assets_root()),
        Box::new(CannedDecisions::always(ConflictDecision::Overwrite)),
        Box::new(AllToolsPresent),
        Box::new(runner),
    );
    let result = orch.create(&req).unwrap();
    assert!(result.success);

    let tools = result.configured_tools();
    assert!(tools.contains(&"venv"));
    assert!(tools.contains(&"pip"));
    assert!(tools.contains(&"git"));
    assert!(tools.contains(&"editorconfig"));
    assert!(tools.contains(&"ruff"));
    assert!(dest.join("requirements.txt").is_file());
    assert!(dest.join(".editorconfig").is_file());

    let commands = recorder.commands();
    assert!(commands.iter().any(|c| c.ends_with(&["-m".into(), "venv".into(), ".venv".into()])));
    assert!(commands.iter().any(|c| c.contains(&"install".to_string())));
    assert!(commands.iter().any(|c| c == &vec!["git".to_string(), "init".to_string()]));
}

#[test]
fn missing_tools_degrade_to_warnings_not_errors() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");
    let req = request(
        Language::JavaScript,
        Some(Variant::Node),
        "demo",
        &dest,
        CreationOptions::default(),
    );

    let result = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)))
        .create(&req)
        .unwrap();

    assert!(result.success, "missing tools must not fail the pipeline");
    assert!(!result.warnings().is_empty());
    assert!(dest.join("package.json").is_file());
    assert_eq!(
        result.stage(Stage::Environment).unwrap().status,
        StageStatus::Degraded
    );
}

#[test]
fn node_variant_materializes_the_js_asset_tree() {
    let tmp = tempfile::TempDir::new().unwrap();
    let node_dest = tmp.path().join("node-proj");
    let js_dest = tmp.path().join("js-proj");

    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)));
    for (variant, dest) in [(Variant::Node, &node_dest), (Variant::Js, &js_dest)] {
        orch.create(&request(
            Language::JavaScript,
            Some(variant),
            "demo",
            dest,
            CreationOptions {
                minimal: true,
                ..Default::default()
            },
        ))
        .unwrap();
    }

    assert_eq!(relative_files(&node_dest), relative_files(&js_dest));
}

#[test]
fn setup_configures_an_existing_project() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");

    // Create a minimal python project first.
    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Overwrite)));
    orch.create(&request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions {
            minimal: true,
            ..Default::default()
        },
    ))
    .unwrap();

    let setup = orch.setup(&dest, Language::Python, false).unwrap();
    assert!(setup.success);
    assert_eq!(setup.variant, Variant::Py);
    // Tooling files were materialized into the existing project.
    assert!(dest.join(".editorconfig").is_file());
    assert!(dest.join("requirements.txt").is_file());
    // python/pip were unavailable, so environment degraded to warnings.
    assert!(!setup.warnings.is_empty());
}

#[test]
fn scripted_decisions_apply_per_conflict_in_walk_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");

    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Overwrite)));
    orch.create(&request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions::default(),
    ))
    .unwrap();

    // Both requirements files exist now. Walk order is sorted by file
    // name, so requirements-dev.txt is asked about first: skip it, then
    // cancel on requirements.txt.
    let scripted = orchestrator(Box::new(CannedDecisions::script(
        vec![ConflictDecision::Skip, ConflictDecision::Cancel],
        ConflictDecision::Overwrite,
    )));
    let setup = scripted.setup(&dest, Language::Python, false).unwrap();

    assert!(!setup.success);
    assert!(
        setup
            .error
            .as_deref()
            .unwrap()
            .ends_with("requirements.txt"),
        "cancel should name the second conflict: {:?}",
        setup.error
    );
}

#[test]
fn setup_on_missing_directory_is_a_validation_error() {
    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)));
    let err = orch
        .setup(Path::new("/nonexistent/project"), Language::Python, false)
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn setup_cancel_stops_remaining_writes() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dest = tmp.path().join("demo");

    let orch = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Overwrite)));
    orch.create(&request(
        Language::Python,
        None,
        "demo",
        &dest,
        CreationOptions::default(),
    ))
    .unwrap();

    // requirements.txt already exists; the first conflict answer is
    // Cancel, which must end the whole setup run.
    let cancelling = orchestrator(Box::new(CannedDecisions::always(ConflictDecision::Cancel)));
    let setup = cancelling.setup(&dest, Language::Python, false).unwrap();
    assert!(!setup.success);
    assert!(setup.error.as_deref().unwrap().contains("cancelled"));
}
