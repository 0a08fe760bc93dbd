//! CLI argument types and helpers for the `tierconf` binary.

pub mod args;
