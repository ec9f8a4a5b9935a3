use clap::{Parser, Subcommand};
use eyre::Result;

use crate::logging::{LoggingFormat, LoggingLevel};
use crate::{compile, serve, specs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile Markdown or plain-text manuscripts into style-conformant Word documents
#[derive(Debug, Parser)]
#[command(name = "styledoc", author, version = VERSION, about, long_about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Display debug level logging and detailed error reports
    #[arg(long, global = true, conflicts_with = "trace")]
    pub debug: bool,

    /// Display trace level logging and detailed error reports
    #[arg(long, global = true, conflicts_with = "debug")]
    pub trace: bool,

    /// The minimum log level to output
    #[arg(long, default_value = "info", global = true)]
    pub log_level: LoggingLevel,

    /// A filter for log entries from dependencies, e.g. `tower_http=debug`
    #[arg(long, default_value = "hyper=info,reqwest=info,tower_http=info", global = true)]
    pub log_filter: String,

    /// The log output format
    #[arg(long, default_value = "auto", global = true)]
    pub log_format: LoggingFormat,

    /// The details to include in error reports: `auto`, `all`, `none`, or a
    /// comma-separated list of `location`, `span`, `env`
    #[arg(long, default_value = "auto", global = true)]
    pub error_details: String,

    /// Include an issue-reporting link in error reports
    #[arg(long, global = true)]
    pub error_link: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a document into a formatted `.docx`
    Compile(compile::Cli),
    /// Inspect and validate style specs
    Specs(specs::Cli),
    /// Run the HTTP server
    Serve(serve::Cli),
}

impl Cli {
    #[tracing::instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        tracing::trace!("running CLI command");
        match self.command {
            Command::Compile(compile) => compile.run().await,
            Command::Specs(specs) => specs.run().await,
            Command::Serve(serve) => serve.run().await,
        }
    }
}
