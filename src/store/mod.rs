//! Configuration store: owns the merged tree and sequences loads.
//!
//! Files are deep-merged in load order; secret entries are written
//! individually through dotted-path `set` semantics; every read
//! consults the environment first. The store is an explicit instance
//! threaded by reference — there is no global singleton.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::merge::{self, MergeError};
use crate::models::{KeyPath, Mapping, Namespace, SecretEntry, Value};
use crate::providers::{ProviderError, SecretProvider};
use crate::resolve::{self, SetError};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mandatory configuration file does not exist.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ReadFile {
        /// The unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML (or JSON).
    #[error("failed to parse configuration file {path}: {source}")]
    ParseFile {
        /// The malformed file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml_ng::Error,
    },

    /// A configuration file parsed to something other than a mapping.
    #[error("configuration file {path} does not contain a mapping")]
    NotAMapping {
        /// The offending file.
        path: PathBuf,
    },

    /// Contract violation in a merge.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Contract violation in a root-path `set`.
    #[error(transparent)]
    Set(#[from] SetError),

    /// Failure passed through unmodified from a secret provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Per-provider settings read from the already-loaded tree at
/// `secrets.<name>.…`. Because they are read through [`ConfigStore::get`],
/// each is itself overridable from the environment
/// (`SECRETS_<NAME>_ENABLED` and friends).
struct ProviderSettings {
    enabled: bool,
    prefix: Option<String>,
    skip_unprefixed: bool,
}

/// Owner of the configuration tree.
///
/// Created once, mutated by successive `load_*`/`set` calls during an
/// initialization phase, then read concurrently-safe only in the sense
/// that reads are pure; interleaved mutation from multiple threads is
/// out of contract and must be serialized by the embedder.
pub struct ConfigStore {
    tree: Mapping,
    env: Env,
    providers: Vec<Box<dyn SecretProvider>>,
}

impl ConfigStore {
    /// Create an empty store reading the given environment.
    pub fn new(env: Env) -> Self {
        Self {
            tree: Mapping::new(),
            env,
            providers: Vec::new(),
        }
    }

    /// Resolve a key path; environment first, then the tree.
    ///
    /// Accepts a dotted string (`"db.username"`), explicit segments, or
    /// [`KeyPath::root()`] for the whole tree. Returns an owned clone;
    /// `None` means the path is absent everywhere.
    pub fn get(&self, path: impl Into<KeyPath>) -> Option<Value> {
        resolve::get(&self.tree, &path.into(), &self.env, None)
    }

    /// [`get`](Self::get) with a fallback value.
    pub fn get_or(&self, path: impl Into<KeyPath>, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// [`get`](Self::get) consulting an explicit environment variable
    /// instead of the path's implicit `A_B_C` name.
    pub fn get_with_env(&self, path: impl Into<KeyPath>, env_var: &str) -> Option<Value> {
        resolve::get(&self.tree, &path.into(), &self.env, Some(env_var))
    }

    /// Write a value at a key path.
    ///
    /// The empty path deep-merges a mapping value into the root; any
    /// other path overwrites the leaf directly, creating intermediate
    /// mappings as needed. Returns `self` for chaining.
    pub fn set(
        &mut self,
        path: impl Into<KeyPath>,
        value: Value,
    ) -> Result<&mut Self, StoreError> {
        resolve::set(&mut self.tree, &path.into(), value)?;
        Ok(self)
    }

    /// Load one YAML (or JSON) file and deep-merge it into the tree.
    ///
    /// Later files override earlier scalars and union sequences. A
    /// missing file is an error unless `graceful`, in which case the
    /// load is a silent no-op. An empty document counts as an empty
    /// mapping; a non-mapping document is an error.
    pub fn load_configuration(
        &mut self,
        path: impl AsRef<Path>,
        graceful: bool,
    ) -> Result<&mut Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            if graceful {
                debug!(path = %path.display(), "optional configuration file missing, skipping");
                return Ok(self);
            }
            return Err(StoreError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_yaml_ng::from_str(&content).map_err(|source| StoreError::ParseFile {
                path: path.to_path_buf(),
                source,
            })?;
        let overlay = match document {
            Value::Null => Mapping::new(), // empty file
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(StoreError::NotAMapping {
                    path: path.to_path_buf(),
                });
            }
        };

        let merged = merge::merge(&[Value::Mapping(self.tree.clone()), Value::Mapping(overlay)])?;
        if let Value::Mapping(mapping) = merged {
            self.tree = mapping;
        }
        debug!(path = %path.display(), "configuration file merged");
        Ok(self)
    }

    /// Register a secret provider. Providers run in registration order
    /// on the next [`load_secrets`](Self::load_secrets) pass.
    pub fn register_provider(&mut self, provider: Box<dyn SecretProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    /// Fetch and fold in every registered provider's entries.
    ///
    /// A provider runs only when `secrets.<name>.enabled` resolves
    /// truthy. Entries are sorted so namespace-qualified names come
    /// after unqualified ones (stable), filtered against the configured
    /// prefix, sniff-parsed, and written through `set` — except the
    /// reserved name `config`, whose value deep-merges into the root
    /// and ends that provider's pass.
    ///
    /// Provider failures propagate unmodified; a malformed secret value
    /// never aborts the pass (it degrades to a verbatim string).
    pub fn load_secrets(&mut self) -> Result<&mut Self, StoreError> {
        for index in 0..self.providers.len() {
            let name = self.providers[index].name().to_string();
            let namespace = self.providers[index].namespace();
            let settings = self.provider_settings(&name);

            if !settings.enabled {
                debug!(provider = %name, "secret provider disabled, skipping");
                continue;
            }

            let entries = self.providers[index].list_entries()?;
            debug!(provider = %name, count = entries.len(), "applying secret entries");
            self.apply_secret_entries(&name, namespace, &settings, entries)?;
        }
        Ok(self)
    }

    fn provider_settings(&self, name: &str) -> ProviderSettings {
        let base = format!("{}.{name}", constants::SECRETS_ROOT);
        let enabled = self
            .get(format!("{base}.enabled"))
            .is_some_and(|v| is_truthy(&v));
        let prefix = match self.get(format!("{base}.prefix")) {
            Some(Value::String(prefix)) if !prefix.is_empty() => Some(prefix),
            _ => None,
        };
        let skip_unprefixed = self
            .get(format!("{base}.skip_unprefixed"))
            .is_some_and(|v| is_truthy(&v));
        ProviderSettings {
            enabled,
            prefix,
            skip_unprefixed,
        }
    }

    fn apply_secret_entries(
        &mut self,
        provider: &str,
        namespace: Namespace,
        settings: &ProviderSettings,
        mut entries: Vec<SecretEntry>,
    ) -> Result<(), StoreError> {
        let delimiter = namespace.delimiter();

        // Namespace-qualified entries apply after unqualified ones so a
        // namespaced value wins on conflict; the sort is stable.
        entries.sort_by_key(|entry| usize::from(entry.name.contains(delimiter)));

        for entry in entries {
            let qualified = entry.name.contains(delimiter);
            let mut name = entry.name.clone();

            if qualified {
                let Some(prefix) = &settings.prefix else {
                    // Foreign namespace and none configured locally.
                    debug!(provider, entry = %entry.name, "skipping namespaced entry, no prefix configured");
                    continue;
                };
                let lead = format!("{prefix}{delimiter}");
                match entry.name.strip_prefix(&lead) {
                    Some(rest) => name = rest.to_string(),
                    None => {
                        debug!(provider, entry = %entry.name, "skipping entry from another namespace");
                        continue;
                    }
                }
            }

            if settings.skip_unprefixed {
                let prefixed = settings
                    .prefix
                    .as_ref()
                    .is_some_and(|p| entry.name.starts_with(&format!("{p}{delimiter}")));
                if !prefixed {
                    debug!(provider, entry = %entry.name, "skipping unprefixed entry");
                    continue;
                }
            }

            let key = namespace.translate(&name);
            let value = resolve::parse_secret_value(&entry.raw_value);

            if key == constants::CONFIG_SENTINEL {
                // Whole-configuration secret: merge into the root and
                // drop the rest of this provider's batch.
                warn!(provider, "'config' sentinel entry consumed, remaining entries dropped");
                self.set(KeyPath::root(), value)?;
                break;
            }
            self.set(key.as_str(), value)?;
        }
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Env::real())
    }
}

/// Loose truthiness for settings values that may arrive as YAML
/// booleans, environment-coerced booleans, or leftover strings.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        _ => true,
    }
}
