//! tierconf — layered configuration resolver (library crate).
//!
//! Builds a single hierarchical configuration tree from YAML files
//! (a superset of JSON), environment variables, and pluggable secret
//! providers. Precedence is deterministic: later files override earlier
//! ones, secrets override files, and environment variables override
//! everything at read time.

pub mod constants;
pub mod env;
pub mod merge;
pub mod models;
pub mod providers;
pub mod resolve;
pub mod store;
