use clap::Parser;
use eyre::Result;

use styledoc_cli::{errors, logging, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (log_level, log_format, error_details) = if cli.debug {
        (logging::LoggingLevel::Debug, logging::LoggingFormat::Pretty, "all")
    } else if cli.trace {
        (logging::LoggingLevel::Trace, logging::LoggingFormat::Pretty, "all")
    } else {
        (cli.log_level, cli.log_format, cli.error_details.as_str())
    };

    errors::setup(error_details, cli.error_link)?;
    logging::setup(log_level, &cli.log_filter, log_format)?;

    cli.run().await
}
