//! The CLI can do a few things. This provides a central point where those things are routed and
//! then done, making it easier to test this crate deterministically.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use odata_sql_cli::*;

/// Translate query options into parameterized SQL.
#[derive(Debug, Parser)]
#[command(name = "odata-sql", version)]
struct CliArguments {
    /// The directory holding the configuration.
    #[arg(
        long = "context",
        env = "ODATA_SQL_CONTEXT_PATH",
        value_name = "DIR",
        default_value = ".",
        global = true
    )]
    context_path: PathBuf,
    /// The command to invoke.
    #[command(subcommand)]
    command: Command,
}

/// The application entrypoint. It pulls information from the environment and then calls the [run]
/// function. The library remains unaware of the environment, so that we can more easily test it.
#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArguments::parse();
    let context = Context {
        context_path: args.context_path,
        output: std::io::stdout(),
    };
    match run(args.command, context).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
