//! Languages and their project variants.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! The supported-variant sets and the variant→asset-folder alias table are
//! exhaustive `match`es, so adding a variant without wiring its folder is a
//! compile error rather than a runtime fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

// ── Language ─────────────────────────────────────────────────────────────────

/// A supported project language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::JavaScript];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }

    /// Variant used when nothing was requested and no markers were found.
    pub const fn default_variant(&self) -> Variant {
        match self {
            Self::Python => Variant::Py,
            Self::JavaScript => Variant::Js,
        }
    }

    /// The full supported-variant set for this language.
    pub const fn supported_variants(&self) -> &'static [Variant] {
        match self {
            Self::Python => &[Variant::Py, Variant::Django],
            Self::JavaScript => &[
                Variant::Js,
                Variant::Node,
                Variant::Ts,
                Variant::React,
                Variant::ReactTs,
                Variant::Vue,
                Variant::VueTs,
            ],
        }
    }

    pub fn supports(&self, variant: Variant) -> bool {
        self.supported_variants().contains(&variant)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" => Ok(Self::JavaScript),
            other => Err(Error::validation(format!(
                "unknown language '{other}' (supported: python, javascript)"
            ))),
        }
    }
}

// ── Variant ──────────────────────────────────────────────────────────────────

/// A language-specific project flavor.
///
/// The variant decides which asset subtree and dependency set apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    Py,
    Django,
    Js,
    Node,
    Ts,
    React,
    ReactTs,
    Vue,
    VueTs,
}

impl Variant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Py => "py",
            Self::Django => "django",
            Self::Js => "js",
            Self::Node => "node",
            Self::Ts => "ts",
            Self::React => "react",
            Self::ReactTs => "react-ts",
            Self::Vue => "vue",
            Self::VueTs => "vue-ts",
        }
    }

    /// Physical folder under the bundled asset tree.
    ///
    /// Related variants share one asset tree: `node` is a plain-js project
    /// as far as templates are concerned, so it aliases to the `js` folder.
    /// The match is exhaustive — a variant without a folder cannot compile.
    pub const fn asset_dir(&self) -> &'static str {
        match self {
            Self::Py => "py",
            Self::Django => "django",
            Self::Js | Self::Node => "js",
            Self::Ts => "ts",
            Self::React => "react",
            Self::ReactTs => "react-ts",
            Self::Vue => "vue",
            Self::VueTs => "vue-ts",
        }
    }

    /// The language this variant belongs to. Intrinsic to the type, so it
    /// lives here rather than in a registry.
    pub const fn language(&self) -> Language {
        match self {
            Self::Py | Self::Django => Language::Python,
            Self::Js | Self::Node | Self::Ts | Self::React | Self::ReactTs | Self::Vue
            | Self::VueTs => Language::JavaScript,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    /// Unrecognized values fail fast — there is deliberately no silent
    /// default here; the caller either names a supported variant or omits
    /// it and lets detection run.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "py" => Ok(Self::Py),
            "django" => Ok(Self::Django),
            "js" => Ok(Self::Js),
            "node" => Ok(Self::Node),
            "ts" => Ok(Self::Ts),
            "react" => Ok(Self::React),
            "react-ts" => Ok(Self::ReactTs),
            "vue" => Ok(Self::Vue),
            "vue-ts" => Ok(Self::VueTs),
            other => Err(Error::validation(format!(
                "unknown project variant '{other}' (supported: py, django, js, node, ts, react, react-ts, vue, vue-ts)"
            ))),
        }
    }
}
