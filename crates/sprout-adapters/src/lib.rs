//! Infrastructure adapters for Sprout.
//!
//! Implements the driven ports defined in `sprout_core::application::ports`:
//! - [`InteractivePrompter`] / [`ScriptedDecisions`] for conflict decisions
//! - [`SystemCommandRunner`] for blocking child processes with timeouts
//! - [`SystemToolProbe`] for tool availability checks

pub mod decision;
pub mod probe;
pub mod process;

pub use decision::{InteractivePrompter, ScriptedDecisions};
pub use probe::SystemToolProbe;
pub use process::SystemCommandRunner;
