//! Sprout Core - project creation pipeline
//!
//! This crate provides the domain and application layers for the Sprout
//! project scaffolding tool, following a ports-and-adapters split.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            sprout-cli (CLI)             │
//! │    (argument parsing, presentation)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          CreationOrchestrator           │
//! │  validate → variant → structure → files │
//! │   → environment → deps → tooling → vcs  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │  (DecisionProvider, ToolProbe, Runner)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     sprout-adapters (Infrastructure)    │
//! │  (InteractivePrompter, SystemRunner, …) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The domain layer (`domain`) holds the value types: languages and
//! variants, the project request, the template context, conflict
//! decisions, and the per-stage result model. The application layer
//! (`application`) holds the five pipeline components: variant detector,
//! asset resolver, template engine, conflict resolver, and the
//! orchestrator that sequences them.

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CreationOrchestrator,
        assets::{AssetLocation, AssetResolver, AssetType},
        ports::{CommandOutput, CommandRunner, DecisionProvider, ToolProbe, ToolStatus},
    };
    pub use crate::domain::{
        ConflictDecision, CreationOptions, CreationResult, Language, ProjectRequest, SetupResult,
        Stage, TemplateContext, Variant,
    };
    pub use crate::error::{Error, Result};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
