//! Turn the configuration read from disk into the one used to translate queries.

use query_engine_sql::sql;

use super::error::MakeRuntimeConfigurationError;
use super::version1::{ParsedConfiguration, SqlDialect};
use crate::configuration::Configuration;

/// Validate the parsed configuration and convert it into the runtime configuration.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let token = parsed_config.space_escape_token;
    if token.trim().is_empty() {
        return Err(MakeRuntimeConfigurationError::BlankSpaceEscapeToken);
    }
    if token.chars().any(char::is_whitespace) {
        return Err(MakeRuntimeConfigurationError::WhitespaceInSpaceEscapeToken { token });
    }

    Ok(Configuration {
        metadata: parsed_config.metadata,
        dialect: match parsed_config.dialect {
            SqlDialect::SqlServer => sql::dialect::Dialect::SqlServer,
            SqlDialect::Postgres => sql::dialect::Dialect::Postgres,
        },
        try_parse_dates: parsed_config.try_parse_dates,
        space_escape_token: token,
    })
}
