//! tierconf — layered configuration resolver CLI.
//!
//! Entry point and error-handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use tierconf::constants;
use tierconf::env::Env;
use tierconf::models::{KeyPath, Namespace, Value};
use tierconf::providers::file::JsonFileProvider;
use tierconf::store::ConfigStore;

use cli::args::{Cli, Command, Format, GetArgs, ShowArgs, SourceArgs};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Get(args) => run_get(args),
        Command::Show(args) => run_show(args),
    }
}

/// Build a store from the selected sources, in precedence order:
/// conventional defaults, explicit files, optional files, then secrets.
fn build_store(sources: &SourceArgs) -> Result<ConfigStore> {
    let mut store = ConfigStore::new(Env::real());

    if !sources.no_defaults {
        if let Some(global) = dirs::config_dir() {
            let path = global
                .join(constants::CONFIG_DIR)
                .join(constants::DEFAULTS_FILENAME);
            store.load_configuration(&path, true)?;
        }
        let config_dir = Path::new(constants::CONFIG_DIRNAME);
        store.load_configuration(config_dir.join(constants::DEFAULTS_FILENAME), true)?;
        store.load_configuration(config_dir.join(constants::LOCAL_FILENAME), true)?;
    }

    for file in &sources.files {
        store
            .load_configuration(file, false)
            .with_context(|| format!("loading {}", file.display()))?;
    }
    for file in &sources.optional_files {
        store.load_configuration(file, true)?;
    }

    if let Some(path) = &sources.secrets_file {
        // The flag is the opt-in; env can still veto via
        // SECRETS_FILE_ENABLED=false.
        store.set("secrets.file.enabled", Value::Bool(true))?;
        store.register_provider(Box::new(JsonFileProvider::new(
            "file",
            Namespace::Flat,
            path,
        )));
        store
            .load_secrets()
            .with_context(|| format!("loading secrets from {}", path.display()))?;
    }

    Ok(store)
}

fn run_get(args: GetArgs) -> Result<()> {
    let store = build_store(&args.sources)?;

    let value = match &args.env_var {
        Some(env_var) => store.get_with_env(args.key.as_str(), env_var),
        None => store.get(args.key.as_str()),
    };

    match value {
        Some(value) => print!("{}", render(&value, args.format)?),
        None => match &args.default {
            Some(default) => println!("{default}"),
            None => anyhow::bail!("key '{}' not found", args.key),
        },
    }
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let store = build_store(&args.sources)?;
    let tree = store
        .get(KeyPath::root())
        .unwrap_or(Value::Mapping(Default::default()));
    print!("{}", render(&tree, args.format)?);
    Ok(())
}

fn render(value: &Value, format: Format) -> Result<String> {
    Ok(match format {
        Format::Yaml => serde_yaml_ng::to_string(value).context("serializing to YAML")?,
        Format::Json => {
            let mut out =
                serde_json::to_string_pretty(value).context("serializing to JSON")?;
            out.push('\n');
            out
        }
    })
}
