//! Conflict resolution for write targets.
//!
//! Policy first, humans second: a missing target is never a conflict, and
//! `force` answers without prompting — Overwrite for files, Merge for
//! directories (force must not silently destroy pre-existing, unrelated
//! files inside a populated directory). Only a real conflict without
//! `force` reaches the injected [`DecisionProvider`].

use std::path::Path;
use tracing::debug;

use crate::application::ports::DecisionProvider;
use crate::domain::{ConflictDecision, Stage};
use crate::error::{Error, Result};

/// Decides, per file or directory write, how to proceed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one target path. `stage` tags provider failures so they
    /// surface as service errors of the stage that asked.
    pub fn resolve(
        &self,
        target: &Path,
        is_directory: bool,
        force: bool,
        provider: &dyn DecisionProvider,
        stage: Stage,
    ) -> Result<ConflictDecision> {
        if !target.exists() {
            return Ok(ConflictDecision::Overwrite);
        }

        if force {
            let decision = if is_directory {
                ConflictDecision::Merge
            } else {
                ConflictDecision::Overwrite
            };
            debug!(target = %target.display(), %decision, "conflict auto-resolved by force");
            return Ok(decision);
        }

        let decision = provider.decide_conflict(target, is_directory).map_err(|e| {
            Error::service(
                stage,
                format!("conflict decision for {}: {e}", target.display()),
            )
        })?;
        debug!(target = %target.display(), %decision, "conflict resolved by provider");
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDecisionProvider;
    use std::fs;
    use tempfile::TempDir;

    /// Provider that fails the test if it is ever consulted.
    fn untouchable() -> MockDecisionProvider {
        let mut provider = MockDecisionProvider::new();
        provider.expect_decide_conflict().never();
        provider
    }

    fn scripted(decision: ConflictDecision) -> MockDecisionProvider {
        let mut provider = MockDecisionProvider::new();
        provider
            .expect_decide_conflict()
            .returning(move |_, _| Ok(decision));
        provider
    }

    #[test]
    fn missing_target_is_overwrite_without_provider_call() {
        let dir = TempDir::new().unwrap();
        let resolver = ConflictResolver::new();
        let decision = resolver
            .resolve(
                &dir.path().join("absent.txt"),
                false,
                false,
                &untouchable(),
                Stage::Files,
            )
            .unwrap();
        assert_eq!(decision, ConflictDecision::Overwrite);
    }

    #[test]
    fn missing_target_is_overwrite_regardless_of_force() {
        let dir = TempDir::new().unwrap();
        let resolver = ConflictResolver::new();
        let decision = resolver
            .resolve(
                &dir.path().join("absent.txt"),
                false,
                true,
                &untouchable(),
                Stage::Files,
            )
            .unwrap();
        assert_eq!(decision, ConflictDecision::Overwrite);
    }

    #[test]
    fn force_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        fs::write(&target, "old").unwrap();

        let resolver = ConflictResolver::new();
        let decision = resolver
            .resolve(&target, false, true, &untouchable(), Stage::Files)
            .unwrap();
        assert_eq!(decision, ConflictDecision::Overwrite);
    }

    #[test]
    fn force_merges_existing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("src");
        fs::create_dir(&target).unwrap();

        let resolver = ConflictResolver::new();
        let decision = resolver
            .resolve(&target, true, true, &untouchable(), Stage::Structure)
            .unwrap();
        assert_eq!(decision, ConflictDecision::Merge);
    }

    #[test]
    fn existing_target_without_force_delegates() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        fs::write(&target, "old").unwrap();

        let resolver = ConflictResolver::new();
        let decision = resolver
            .resolve(
                &target,
                false,
                false,
                &scripted(ConflictDecision::Skip),
                Stage::Files,
            )
            .unwrap();
        assert_eq!(decision, ConflictDecision::Skip);
    }

    #[test]
    fn provider_failure_becomes_stage_tagged_service_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.txt");
        fs::write(&target, "old").unwrap();

        let mut provider = MockDecisionProvider::new();
        provider.expect_decide_conflict().returning(|_, _| {
            Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed",
            ))
        });

        let resolver = ConflictResolver::new();
        let err = resolver
            .resolve(&target, false, false, &provider, Stage::Tooling)
            .unwrap_err();
        match err {
            Error::Service { stage, .. } => assert_eq!(stage, Stage::Tooling),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
