//! The interpretation of the commands that the CLI can handle.
//!
//! The CLI can do a few things. This provides a central point where those things are routed and
//! then done, making it easier to test this crate deterministically.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Subcommand};
use tokio::fs;

use odata_sql::{ConvertOptions, Converter, QueryParameters};
use odata_sql_configuration as configuration;

/// The various contextual bits and bobs we need to run.
pub struct Context<Output: Write> {
    pub context_path: PathBuf,
    pub output: Output,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize a configuration in the current (empty) directory.
    Initialize,
    /// Print the JSON schema of the configuration file.
    PrintSchema,
    /// Translate query options into SQL and print it with its parameters as JSON.
    Convert(ConvertArguments),
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArguments {
    /// The table to query.
    #[arg(long, required_unless_present = "raw_sql", conflicts_with = "raw_sql")]
    pub table: Option<String>,
    /// A SQL fragment to query instead of a table.
    #[arg(long)]
    pub raw_sql: Option<String>,
    /// A query option, such as `$top=10`. May be given more than once.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
    /// Count the matching rows instead of returning them.
    #[arg(long)]
    pub count: bool,
    /// Bind date-like strings as strings.
    #[arg(long)]
    pub no_date_parsing: bool,
}

fn parse_key_value(argument: &str) -> Result<(String, String), String> {
    argument
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{argument}'"))
}

/// Run a command in a given directory.
pub async fn run(command: Command, context: Context<impl Write>) -> anyhow::Result<()> {
    match command {
        Command::Initialize => initialize(context).await?,
        Command::PrintSchema => print_schema(context)?,
        Command::Convert(arguments) => convert(arguments, context).await?,
    };
    Ok(())
}

/// Initialize an empty directory with a default configuration.
///
/// Refuses to overwrite an existing configuration file.
async fn initialize(context: Context<impl Write>) -> anyhow::Result<()> {
    let configuration_file = context
        .context_path
        .join(configuration::CONFIGURATION_FILENAME);
    if fs::try_exists(&configuration_file).await? {
        anyhow::bail!(
            "Cannot initialize: {} already exists.",
            configuration_file.display()
        );
    }

    configuration::write_parsed_configuration(
        configuration::ParsedConfiguration::initial(),
        &context.context_path,
    )
    .await?;
    tracing::info!("initialized {}", context.context_path.display());
    Ok(())
}

fn print_schema(mut context: Context<impl Write>) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(configuration::ParsedConfiguration);
    serde_json::to_writer_pretty(&mut context.output, &schema)?;
    writeln!(context.output)?;
    Ok(())
}

/// Read the configuration of the context directory, falling back to the initial one when
/// there is none.
async fn read_configuration(context_path: &Path) -> anyhow::Result<configuration::Configuration> {
    let parsed = if fs::try_exists(context_path.join(configuration::CONFIGURATION_FILENAME)).await?
    {
        configuration::parse_configuration(context_path).await?
    } else {
        tracing::debug!(
            "no configuration in {}, using the initial one",
            context_path.display()
        );
        configuration::ParsedConfiguration::initial()
    };
    Ok(configuration::make_runtime_configuration(parsed)?)
}

async fn convert(
    arguments: ConvertArguments,
    mut context: Context<impl Write>,
) -> anyhow::Result<()> {
    let converter = Converter::new(Arc::new(read_configuration(&context.context_path).await?));
    let parameters: QueryParameters = arguments.params.into_iter().collect();
    let options = ConvertOptions {
        count: arguments.count,
        try_parse_dates: arguments.no_date_parsing.then_some(false),
    };

    let query = match (&arguments.table, &arguments.raw_sql) {
        (Some(table), None) => converter.convert(table, &parameters, options)?,
        (None, Some(raw_sql)) => converter.convert_from_raw_sql(raw_sql, &parameters, options)?,
        _ => anyhow::bail!("exactly one of --table and --raw-sql must be given"),
    };

    serde_json::to_writer_pretty(&mut context.output, &query)?;
    writeln!(context.output)?;
    Ok(())
}
