//! Shared types used across all modules.
//!
//! Defines the configuration tree value type, key paths, and the secret
//! entry shape providers produce. Other modules import from here rather
//! than reaching into each other's internals.

pub mod path;

use serde::{Deserialize, Serialize};

pub use path::KeyPath;

/// A node in the configuration tree: null, bool, number, string,
/// sequence, or mapping. Mappings preserve insertion order, which keeps
/// iteration deterministic across loads.
pub type Value = serde_yaml_ng::Value;

/// The ordered string-keyed mapping backing every tree level.
pub type Mapping = serde_yaml_ng::Mapping;

/// A single (name, raw value) pair fetched from a secret provider.
///
/// Transient by design: parsed, folded into the tree, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    /// Entry name, optionally namespace-qualified (see [`Namespace`]).
    pub name: String,
    /// Raw string value as stored by the provider.
    #[serde(rename = "value")]
    pub raw_value: String,
}

impl SecretEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Naming convention a provider uses for namespace-qualified entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Flat dotted keys with an `@` namespace delimiter:
    /// `myapp@db.username` belongs to namespace `myapp`.
    Flat,
    /// Dashed path keys with a `---` namespace delimiter:
    /// `myapp---db--pool-size`. Stores in this style typically forbid
    /// `.` and `_` in names, so `--` stands for the path dot and `-`
    /// for the underscore.
    Dashed,
}

impl Namespace {
    /// The delimiter separating a namespace prefix from the entry name.
    pub fn delimiter(self) -> &'static str {
        match self {
            Namespace::Flat => "@",
            Namespace::Dashed => "---",
        }
    }

    /// Translate a provider-native name (prefix already stripped) into a
    /// dotted key path.
    pub fn translate(self, name: &str) -> String {
        match self {
            Namespace::Flat => name.to_string(),
            Namespace::Dashed => name.replace("--", ".").replace('-', "_"),
        }
    }
}
