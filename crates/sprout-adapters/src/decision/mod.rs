//! Decision provider implementations.
//!
//! [`InteractivePrompter`] asks on the terminal; [`ScriptedDecisions`]
//! answers from a fixed script and is what tests and non-interactive runs
//! inject.

mod interactive;
mod scripted;

pub use interactive::InteractivePrompter;
pub use scripted::ScriptedDecisions;
