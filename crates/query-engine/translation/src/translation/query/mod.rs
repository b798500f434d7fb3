//! Translate the query options of one request into a select.

pub mod aggregates;
pub mod apply;
pub mod fields;
pub mod filtering;
pub mod sorting;
pub mod values;

use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::{Env, State};
use crate::translation::parser::{ParserFactory, QueryOptionParser, QueryParameters};

/// The name the output of an apply pipeline is known by to the rest of the query.
const APPLY_ALIAS: &str = "apply";

/// The name a raw SQL source is known by.
const RAW_SQL_ALIAS: &str = "RawSql";

/// What a query reads rows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// A table, optionally qualified as `schema.table`.
    Table(String),
    /// A SQL fragment, exposed to the query as a common table expression.
    RawSql(String),
}

impl QuerySource {
    fn entity_name(&self) -> &str {
        match self {
            QuerySource::Table(name) => name.trim(),
            QuerySource::RawSql(_) => RAW_SQL_ALIAS,
        }
    }

    fn to_select(&self) -> Result<sql::ast::Select, Error> {
        match self {
            QuerySource::Table(name) if name.trim().is_empty() => Err(Error::InvalidArgument(
                "the table name must not be empty".to_string(),
            )),
            QuerySource::RawSql(raw_sql) if raw_sql.trim().is_empty() => Err(
                Error::InvalidArgument("the raw SQL source must not be empty".to_string()),
            ),
            QuerySource::Table(name) if name.matches('.').count() > 1 => {
                Err(Error::InvalidArgument(format!(
                    "the table name '{}' has more than a schema and a table part",
                    name.trim()
                )))
            }
            QuerySource::Table(name) => Ok(sql::helpers::table_select(
                sql::helpers::make_table_reference(name.trim()),
            )),
            QuerySource::RawSql(raw_sql) => Ok(sql::helpers::raw_sql_select(
                raw_sql.trim().to_string(),
                sql::helpers::make_table_alias(RAW_SQL_ALIAS.to_string()),
            )),
        }
    }
}

/// Translate the query options of a request against a source.
///
/// In count mode the result has a single `count` column and ignores ordering, paging and
/// projection.
pub fn translate<F: ParserFactory>(
    env: &Env,
    factory: &F,
    source: &QuerySource,
    parameters: &QueryParameters,
    count: bool,
) -> Result<sql::ast::Select, Error> {
    let mut state = State::new();
    let mut select = source.to_select()?;

    let entity = env.metadata.entity_model(source.entity_name());
    let parser = factory.create_parser(&entity, parameters)?;

    let filter = parser.parse_filter()?;
    let select_expand = parser.parse_select_and_expand()?;

    if let Some(transformations) = parser.parse_apply()? {
        select = apply::translate_apply(env, &mut state, select, &transformations)?;
        if filter.is_some() || select_expand.is_some() {
            select = sql::helpers::wrap_select(
                select,
                sql::helpers::make_table_alias(APPLY_ALIAS.to_string()),
            );
        }
    }

    if let Some(filter) = &filter {
        let predicate = filtering::translate_expression(env, filter)?;
        let sql::ast::Where(existing) = select.where_;
        select.where_ = sql::ast::Where(sql::helpers::and_where(existing, predicate));
    }

    if count {
        // a reshaped select is counted from the outside
        if select.select_list != sql::ast::SelectList::SelectStar {
            select = sql::helpers::wrap_select(
                select,
                sql::helpers::make_table_alias(APPLY_ALIAS.to_string()),
            );
        }
        select.select_list = sql::ast::SelectList::Count;
        tracing::info!("SQL AST: {:?}", select);
        return Ok(select);
    }

    select.limit = sql::ast::Limit {
        limit: parser
            .parse_top()?
            .map(|top| to_row_count("top", top))
            .transpose()?,
        offset: parser
            .parse_skip()?
            .map(|skip| to_row_count("skip", skip))
            .transpose()?,
    };

    if let Some(order_by) = parser.parse_order_by()? {
        select.order_by = sorting::translate_order_by(env, &order_by);
    }

    if let Some(select_expand) = &select_expand {
        fields::translate_fields(env, &mut select, select_expand)?;
    }

    tracing::info!("SQL AST: {:?}", select);
    Ok(select)
}

fn to_row_count(option: &str, value: u64) -> Result<u32, Error> {
    u32::try_from(value)
        .map_err(|_| Error::InvalidArgument(format!("${option} is too large: {value}")))
}
