use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use styledoc_specs::{builtin_specs, get_spec_schema, validate_custom_spec};

/// Inspect and validate style specs
#[derive(Debug, Parser)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the built-in style spec names
    List,
    /// Print the JSON schema that a custom style spec must conform to
    Schema,
    /// Validate a custom style spec JSON file
    Validate {
        /// Path to the style spec JSON file
        path: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::List => {
                for name in builtin_specs().into_keys() {
                    tracing::info!("{name}");
                }
            }
            Command::Schema => {
                let schema = serde_json::to_string_pretty(&get_spec_schema()).wrap_err("serializing spec schema")?;
                println!("{schema}");
            }
            Command::Validate { path } => {
                let json = fs::read_to_string(&path).wrap_err_with(|| format!("reading `{}`", path.display()))?;
                let spec = validate_custom_spec(&json)?;
                tracing::info!("`{}` is a valid style spec named \"{}\"", path.display(), spec.name);
            }
        }
        Ok(())
    }
}
