//! Runtime configuration for the query translator.

use query_engine_metadata::metadata;
use query_engine_sql::sql;

/// The 'Configuration' type collects all the information necessary to translate queries at
/// runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration'. Separating the two keeps the handling of the on-disk format
/// out of the translation logic.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub metadata: metadata::Metadata,
    pub dialect: sql::dialect::Dialect,
    pub try_parse_dates: bool,
    pub space_escape_token: String,
}
