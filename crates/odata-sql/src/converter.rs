//! The entry points: translate query options against a table or a raw SQL fragment.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use odata_sql_configuration::Configuration;
use query_engine_sql::sql;
use query_engine_translation::translation;
use query_engine_translation::translation::error::Error;
use query_engine_translation::translation::parser::{ParserFactory, QueryParameters};
use query_engine_translation::translation::query::QuerySource;

use crate::json_parser::JsonParserFactory;

/// Per-call knobs of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Count the matching rows instead of returning them.
    pub count: bool,
    /// Overrides the configured date heuristic when set.
    pub try_parse_dates: Option<bool>,
}

/// SQL text with the values bound to its placeholders, in binding order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: IndexMap<String, sql::string::Param>,
}

/// Translates query options into SQL in the configured dialect.
///
/// A converter holds no per-call state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Converter<F = JsonParserFactory> {
    configuration: Arc<Configuration>,
    factory: F,
}

impl Converter<JsonParserFactory> {
    pub fn new(configuration: Arc<Configuration>) -> Self {
        Converter::with_parser_factory(configuration, JsonParserFactory)
    }
}

impl<F: ParserFactory> Converter<F> {
    pub fn with_parser_factory(configuration: Arc<Configuration>, factory: F) -> Self {
        Converter {
            configuration,
            factory,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Translate the query options against a table and compile the result.
    pub fn convert(
        &self,
        table_name: &str,
        parameters: &QueryParameters,
        options: ConvertOptions,
    ) -> Result<CompiledQuery, Error> {
        let select = self.build_query_model(table_name, parameters, options)?;
        Ok(self.compile(&select))
    }

    /// Translate the query options against a SQL fragment and compile the result.
    pub fn convert_from_raw_sql(
        &self,
        raw_sql: &str,
        parameters: &QueryParameters,
        options: ConvertOptions,
    ) -> Result<CompiledQuery, Error> {
        let select = self.build_query_model_from_raw_sql(raw_sql, parameters, options)?;
        Ok(self.compile(&select))
    }

    /// Translate the query options against a table, without compiling.
    pub fn build_query_model(
        &self,
        table_name: &str,
        parameters: &QueryParameters,
        options: ConvertOptions,
    ) -> Result<sql::ast::Select, Error> {
        self.build(&QuerySource::Table(table_name.to_string()), parameters, options)
    }

    /// Translate the query options against a SQL fragment, without compiling.
    pub fn build_query_model_from_raw_sql(
        &self,
        raw_sql: &str,
        parameters: &QueryParameters,
        options: ConvertOptions,
    ) -> Result<sql::ast::Select, Error> {
        self.build(&QuerySource::RawSql(raw_sql.to_string()), parameters, options)
    }

    /// Render a query model in the configured dialect.
    pub fn compile(&self, select: &sql::ast::Select) -> CompiledQuery {
        let query = sql::convert::select_to_sql(select, self.configuration.dialect);
        CompiledQuery {
            sql: query.sql,
            params: query.params,
        }
    }

    fn build(
        &self,
        source: &QuerySource,
        parameters: &QueryParameters,
        options: ConvertOptions,
    ) -> Result<sql::ast::Select, Error> {
        let span = tracing::info_span!("build query model", count = options.count);
        span.in_scope(|| {
            let settings = translation::helpers::Settings {
                try_parse_dates: options
                    .try_parse_dates
                    .unwrap_or(self.configuration.try_parse_dates),
                space_escape: self.configuration.space_escape_token.clone(),
            };
            let env = translation::helpers::Env::new(&self.configuration.metadata, settings);
            translation::query::translate(&env, &self.factory, source, parameters, options.count)
        })
    }
}
