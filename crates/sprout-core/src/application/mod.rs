//! Application layer for Sprout.
//!
//! This layer contains the five pipeline components:
//! - **Variant detector**: infers a project flavor from existing files
//! - **Asset resolver**: maps (language, variant, asset type) to a bundled
//!   source directory
//! - **Template engine**: `{{TOKEN}}` substitution with token validation
//! - **Conflict resolver**: per-path overwrite/skip/merge/cancel decisions
//! - **Creation orchestrator**: sequences the stages and folds the results
//!
//! plus the **ports** (traits) the orchestrator needs from the outside
//! world. The `sprout-adapters` crate provides implementations.

pub mod assets;
pub mod conflict;
pub mod detector;
pub mod orchestrator;
pub mod ports;
pub mod template;

pub use assets::{AssetLocation, AssetResolver, AssetType};
pub use conflict::ConflictResolver;
pub use detector::VariantDetector;
pub use orchestrator::CreationOrchestrator;
pub use ports::{CommandOutput, CommandRunner, DecisionProvider, ToolProbe, ToolStatus};
pub use template::{TemplateEngine, TokenReport};
