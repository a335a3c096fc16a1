//! Bundled asset resolution.
//!
//! Assets ship with the tool under
//! `<asset_root>/languages/<language>/<folder>/<asset_type>/...` where
//! `<folder>` comes from the variant's alias table
//! ([`Variant::asset_dir`]). The resolver validates the (language, variant)
//! pair and that the resolved directory actually exists — an invalid pair
//! or a missing tree is raised, never silently substituted.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{Language, Variant};
use crate::error::{Error, Result};

/// Kinds of bundled assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    /// The project files themselves (manifests, sources, public assets).
    Scaffold,
    /// Dependency manifests materialized by the dependencies stage
    /// (Python requirements files).
    Requirements,
    /// Editor and linter configuration written by the tooling stage.
    Tooling,
}

impl AssetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::Requirements => "requirements",
            Self::Tooling => "tooling",
        }
    }
}

/// A resolved asset source directory. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub language: Language,
    pub variant: Variant,
    pub asset_type: AssetType,
    pub path: PathBuf,
}

/// Maps (language, variant, asset type) to a bundled source directory.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an asset directory, validating the pair and its existence.
    pub fn resolve(
        &self,
        language: Language,
        variant: Variant,
        asset_type: AssetType,
    ) -> Result<AssetLocation> {
        if !language.supports(variant) {
            return Err(Error::validation(format!(
                "variant '{variant}' is not supported for {language}"
            )));
        }

        let path = self.asset_path(language, variant, asset_type);
        if !path.is_dir() {
            return Err(Error::validation(format!(
                "bundled assets missing at {} — the installation is incomplete or the assets root is wrong",
                path.display()
            )));
        }

        debug!(%language, %variant, asset_type = asset_type.as_str(), path = %path.display(), "asset resolved");
        Ok(AssetLocation {
            language,
            variant,
            asset_type,
            path,
        })
    }

    /// Whether the asset exists, for asset types that are optional per
    /// language (JavaScript variants carry no requirements asset).
    pub fn has(&self, language: Language, variant: Variant, asset_type: AssetType) -> bool {
        language.supports(variant) && self.asset_path(language, variant, asset_type).is_dir()
    }

    fn asset_path(&self, language: Language, variant: Variant, asset_type: AssetType) -> PathBuf {
        self.root
            .join("languages")
            .join(language.as_str())
            .join(variant.asset_dir())
            .join(asset_type.as_str())
    }
}
