//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! aliases, help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "sprout",
    bin_name = "sprout",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Project scaffolding for Python and JavaScript",
    long_about = "Sprout creates and configures Python and JavaScript projects \
                  from bundled templates, without clobbering files you already have.",
    after_help = "EXAMPLES:\n\
        \x20 sprout new demo --lang python\n\
        \x20 sprout new webapp --lang javascript --type react\n\
        \x20 sprout setup . --lang python\n\
        \x20 sprout list --lang javascript\n\
        \x20 sprout completions bash > /usr/share/bash-completion/completions/sprout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the bundled templates.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 sprout new demo --lang python\n\
            \x20 sprout new api --lang python --type django\n\
            \x20 sprout new webapp --lang javascript --type react-ts --minimal"
    )]
    New(NewArgs),

    /// Configure an existing project (environment, dependencies, tooling).
    #[command(
        about = "Set up an existing project",
        after_help = "EXAMPLES:\n\
            \x20 sprout setup . --lang python\n\
            \x20 sprout setup ../webapp --lang javascript"
    )]
    Setup(SetupArgs),

    /// List supported languages and variants.
    #[command(
        visible_alias = "ls",
        about = "List supported languages and variants",
        after_help = "EXAMPLES:\n\
            \x20 sprout list\n\
            \x20 sprout list --lang javascript\n\
            \x20 sprout list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprout completions bash > ~/.local/share/bash-completion/completions/sprout\n\
            \x20 sprout completions zsh  > ~/.zfunc/_sprout\n\
            \x20 sprout completions fish > ~/.config/fish/completions/sprout.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `sprout new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Project language. Falls back to the configured default.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        value_enum,
        help = "Project language"
    )]
    pub language: Option<Language>,

    /// Project variant (e.g. react, django). Detected from the
    /// destination when omitted; unknown values are rejected.
    #[arg(
        short = 't',
        long = "type",
        value_name = "VARIANT",
        help = "Project variant (py, django, js, node, ts, react, react-ts, vue, vue-ts)"
    )]
    pub variant: Option<String>,

    /// Produce only the source structure: skip environment, dependency,
    /// tooling and VCS stages.
    #[arg(long = "minimal", help = "Create source structure only")]
    pub minimal: bool,

    /// Resolve conflicts without prompting: overwrite existing files,
    /// merge into existing directories.
    #[arg(long = "force", help = "Overwrite files / merge directories without prompting")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Extra template variables as KEY=VALUE; override built-in facts.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Extra template variable (repeatable)"
    )]
    pub var: Vec<String>,
}

// ── setup ─────────────────────────────────────────────────────────────────────

/// Arguments for `sprout setup`.
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Project directory to configure.
    #[arg(value_name = "PATH", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    /// Project language.
    #[arg(
        short = 'l',
        long = "lang",
        value_name = "LANGUAGE",
        value_enum,
        help = "Project language"
    )]
    pub language: Option<Language>,

    /// Overwrite existing configuration files without prompting.
    #[arg(long = "force", help = "Overwrite existing files without prompting")]
    pub force: bool,

    /// Answer prompts non-interactively with safe defaults.
    #[arg(short = 'y', long = "yes", help = "Run non-interactively")]
    pub yes: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `sprout list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by language.
    #[arg(short = 'l', long = "lang", value_enum, help = "Filter by language")]
    pub language: Option<Language>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One variant per line.
    List,
    /// JSON object.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `sprout completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Supported project languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Language {
    /// Also accepted as `py`.
    #[value(alias = "py")]
    Python,
    /// Also accepted as `js`.
    #[value(alias = "js")]
    JavaScript,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::JavaScript => write!(f, "javascript"),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
