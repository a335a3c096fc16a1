//! Tool availability probing.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use sprout_core::application::ports::{CommandRunner, ToolProbe, ToolStatus};

use crate::process::SystemCommandRunner;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes for tools by running `<name> --version`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolProbe {
    runner: SystemCommandRunner,
}

impl SystemToolProbe {
    pub fn new() -> Self {
        Self {
            runner: SystemCommandRunner::new(),
        }
    }
}

impl ToolProbe for SystemToolProbe {
    fn check_available(&self, name: &str) -> ToolStatus {
        match self
            .runner
            .run(&[name, "--version"], Path::new("."), PROBE_TIMEOUT)
        {
            Ok(output) if output.success() => {
                let version = first_line(&output.stdout).or_else(|| first_line(&output.stderr));
                debug!(tool = name, version = version.as_deref().unwrap_or("unknown"), "tool found");
                ToolStatus::found(version)
            }
            Ok(_) | Err(_) => {
                debug!(tool = name, "tool not available");
                ToolStatus::missing()
            }
        }
    }
}

fn first_line(text: &str) -> Option<String> {
    let line = text.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_reports_unavailable() {
        let probe = SystemToolProbe::new();
        let status = probe.check_available("sprout-definitely-not-installed");
        assert!(!status.available);
        assert!(status.version.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn present_tool_reports_a_version() {
        // `sh` is not versioned uniformly, but git is a workspace
        // requirement for development; fall back to skipping when absent.
        let probe = SystemToolProbe::new();
        let status = probe.check_available("git");
        if status.available {
            assert!(status.version.unwrap().contains("git"));
        }
    }

    #[test]
    fn first_line_trims_and_skips_empty() {
        assert_eq!(first_line("git version 2.39\nmore"), Some("git version 2.39".into()));
        assert_eq!(first_line("\n"), None);
        assert_eq!(first_line(""), None);
    }
}
