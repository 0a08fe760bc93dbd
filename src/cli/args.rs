//! Clap argument types for the tierconf CLI.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Layered configuration resolver.
#[derive(Parser, Debug)]
#[command(
    name = "tierconf",
    version = tierconf::constants::VERSION,
    about = "Resolve layered configuration from YAML files, environment variables, and secret documents",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Resolve a single key and print its value.
    Get(GetArgs),

    /// Print the fully merged configuration tree.
    Show(ShowArgs),
}

/// Source-selection flags shared by all commands.
#[derive(Parser, Debug)]
pub struct SourceArgs {
    /// Configuration file to load, in order; a missing file aborts.
    #[arg(short = 'f', long = "file")]
    pub files: Vec<PathBuf>,

    /// Configuration file to load if present; missing files are skipped.
    #[arg(long = "optional-file")]
    pub optional_files: Vec<PathBuf>,

    /// JSON document of secret entries, registered as provider `file`.
    #[arg(long = "secrets-file")]
    pub secrets_file: Option<PathBuf>,

    /// Skip the conventional defaults (`~/.config/tierconf/defaults.yml`,
    /// `config/defaults.yml`, `config/local.yml`).
    #[arg(long, default_value_t = false)]
    pub no_defaults: bool,
}

/// Arguments for the `get` subcommand.
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dotted key path, e.g. `db.username`.
    pub key: String,

    /// Value printed when the key resolves to nothing.
    #[arg(long)]
    pub default: Option<String>,

    /// Environment variable consulted instead of the implicit name
    /// derived from the key path.
    #[arg(long)]
    pub env_var: Option<String>,

    /// Output serialization format.
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Output serialization format.
    #[arg(long, value_enum, default_value_t = Format::Yaml)]
    pub format: Format,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// YAML document.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}
