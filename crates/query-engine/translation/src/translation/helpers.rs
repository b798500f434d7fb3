//! Helpers for processing the parsed query options and building SQL.

use odata_sql_models as models;
use query_engine_metadata::metadata;
use query_engine_sql::sql;

use super::error::Error;

/// The token standing for a space in property names.
pub const DEFAULT_SPACE_ESCAPE: &str = "_x0020_";

/// Knobs of one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bind string constants that read as dates as date/time instants.
    pub try_parse_dates: bool,
    pub space_escape: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            try_parse_dates: true,
            space_escape: DEFAULT_SPACE_ESCAPE.to_string(),
        }
    }
}

/// Static information from the query and metadata.
#[derive(Debug)]
pub struct Env<'a> {
    pub metadata: &'a metadata::Metadata,
    settings: Settings,
}

/// Stateful information changed throughout the translation process.
#[derive(Debug, Default)]
pub struct State {
    stage_index: u64,
}

impl<'a> Env<'a> {
    pub fn new(metadata: &'a metadata::Metadata, settings: Settings) -> Env<'a> {
        Env { metadata, settings }
    }

    pub fn try_parse_dates(&self) -> bool {
        self.settings.try_parse_dates
    }

    /// Trim a property name and restore the spaces its escape tokens stand for.
    pub fn unescape_name(&self, name: &str) -> String {
        name.trim().replace(&self.settings.space_escape, " ")
    }

    /// The column name a property reference points at.
    pub fn resolve_column_name(&self, node: &models::Expression) -> Result<String, Error> {
        match node.unwrap_convert() {
            models::Expression::Property { name, .. } => Ok(self.unescape_name(name)),
            other => Err(Error::NotSupported(format!(
                "a {} where a property is expected",
                other.kind_name()
            ))),
        }
    }

    /// A column reference to the property the node points at.
    pub fn resolve_column(&self, node: &models::Expression) -> Result<sql::ast::ColumnReference, Error> {
        Ok(sql::helpers::make_column(self.resolve_column_name(node)?))
    }
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    /// A fresh alias for a materialized pipeline stage.
    pub fn make_stage_alias(&mut self) -> sql::ast::TableAlias {
        self.stage_index += 1;
        sql::helpers::make_table_alias(format!("stage_{}", self.stage_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_spaces_are_restored() {
        let metadata = metadata::Metadata::empty();
        let env = Env::new(&metadata, Settings::default());
        assert_eq!(env.unescape_name(" Unit_x0020_Price "), "Unit Price");

        let env = Env::new(
            &metadata,
            Settings {
                space_escape: "__".to_string(),
                ..Settings::default()
            },
        );
        assert_eq!(env.unescape_name("Unit__Price"), "Unit Price");
    }

    #[test]
    fn stage_aliases_are_numbered_from_one() {
        let mut state = State::new();
        assert_eq!(state.make_stage_alias().name, "stage_1");
        assert_eq!(state.make_stage_alias().name, "stage_2");
    }
}
