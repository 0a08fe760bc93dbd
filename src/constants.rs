//! App-wide constants.
//!
//! Centralises the tool name, reserved key names, and conventional file
//! names so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "tierconf";

/// Reserved secret entry name whose value is a whole configuration tree
/// rather than a single leaf.
pub const CONFIG_SENTINEL: &str = "config";

/// Settings subtree for secret providers (`secrets.<provider>.…`).
pub const SECRETS_ROOT: &str = "secrets";

/// Conventional defaults file, loaded first and gracefully by the CLI.
pub const DEFAULTS_FILENAME: &str = "defaults.yml";

/// Conventional local-overrides file, loaded gracefully by the CLI.
pub const LOCAL_FILENAME: &str = "local.yml";

/// Conventional per-project configuration directory.
pub const CONFIG_DIRNAME: &str = "config";

/// Directory name under `~/.config/` for the global defaults file.
pub const CONFIG_DIR: &str = "tierconf";

/// Environment variable controlling log verbosity.
pub const ENV_LOG: &str = "TIERCONF_LOG";

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
