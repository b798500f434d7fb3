//! The boundary with query option parsers.
//!
//! A parser is built from an entity description and the raw query options, and hands each
//! clause out independently. Every clause is optional and may be asked for any number of times.

use std::collections::BTreeMap;
use std::fmt;

use odata_sql_models as models;
use query_engine_metadata::metadata::EntityModel;
use serde::Deserialize;
use thiserror::Error;

/// Raw query options, from parameter name to unparsed value.
pub type QueryParameters = BTreeMap<String, String>;

/// The query options we recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, enum_iterator::Sequence)]
pub enum QueryOption {
    Select,
    Filter,
    OrderBy,
    Top,
    Skip,
    Apply,
    Expand,
    Count,
}

impl QueryOption {
    pub fn name(self) -> &'static str {
        match self {
            QueryOption::Select => "select",
            QueryOption::Filter => "filter",
            QueryOption::OrderBy => "orderby",
            QueryOption::Top => "top",
            QueryOption::Skip => "skip",
            QueryOption::Apply => "apply",
            QueryOption::Expand => "expand",
            QueryOption::Count => "count",
        }
    }

    /// Recognize a raw parameter name. Names are case-insensitive and the leading `$` is optional.
    pub fn from_key(key: &str) -> Option<QueryOption> {
        let key = key.trim();
        let name = key.strip_prefix('$').unwrap_or(key);
        enum_iterator::all::<QueryOption>().find(|option| option.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for QueryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name())
    }
}

/// Pick the recognized options out of the raw query parameters.
pub fn recognize_options(
    parameters: &QueryParameters,
) -> Result<BTreeMap<QueryOption, &str>, ParseError> {
    let mut options = BTreeMap::new();
    for (key, value) in parameters {
        match QueryOption::from_key(key) {
            None => tracing::debug!("ignoring unrecognized query option '{key}'"),
            Some(option) => {
                if options.insert(option, value.as_str()).is_some() {
                    return Err(ParseError::new(option, "the option is given more than once"));
                }
            }
        }
    }
    Ok(options)
}

/// A query option could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {option} query option: {message}")]
pub struct ParseError {
    pub option: QueryOption,
    pub message: String,
}

impl ParseError {
    pub fn new(option: QueryOption, message: impl Into<String>) -> Self {
        ParseError {
            option,
            message: message.into(),
        }
    }
}

/// Hands out the parsed clauses of one request.
pub trait QueryOptionParser {
    fn parse_filter(&self) -> Result<Option<models::Expression>, ParseError>;
    fn parse_apply(&self) -> Result<Option<Vec<models::Transformation>>, ParseError>;
    fn parse_order_by(&self) -> Result<Option<models::OrderByClause>, ParseError>;
    fn parse_top(&self) -> Result<Option<u64>, ParseError>;
    fn parse_skip(&self) -> Result<Option<u64>, ParseError>;
    fn parse_select_and_expand(&self) -> Result<Option<models::SelectExpandClause>, ParseError>;
}

/// Builds a parser for one request.
pub trait ParserFactory {
    type Parser: QueryOptionParser;

    fn create_parser(
        &self,
        entity: &EntityModel,
        parameters: &QueryParameters,
    ) -> Result<Self::Parser, ParseError>;
}

/// Clauses that were parsed elsewhere.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClauses {
    pub filter: Option<models::Expression>,
    pub apply: Option<Vec<models::Transformation>>,
    pub order_by: Option<models::OrderByClause>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub select_expand: Option<models::SelectExpandClause>,
}

impl QueryOptionParser for ParsedClauses {
    fn parse_filter(&self) -> Result<Option<models::Expression>, ParseError> {
        Ok(self.filter.clone())
    }

    fn parse_apply(&self) -> Result<Option<Vec<models::Transformation>>, ParseError> {
        Ok(self.apply.clone())
    }

    fn parse_order_by(&self) -> Result<Option<models::OrderByClause>, ParseError> {
        Ok(self.order_by.clone())
    }

    fn parse_top(&self) -> Result<Option<u64>, ParseError> {
        Ok(self.top)
    }

    fn parse_skip(&self) -> Result<Option<u64>, ParseError> {
        Ok(self.skip)
    }

    fn parse_select_and_expand(&self) -> Result<Option<models::SelectExpandClause>, ParseError> {
        Ok(self.select_expand.clone())
    }
}

/// Already parsed clauses ignore the raw parameters.
impl ParserFactory for ParsedClauses {
    type Parser = ParsedClauses;

    fn create_parser(
        &self,
        _entity: &EntityModel,
        _parameters: &QueryParameters,
    ) -> Result<Self::Parser, ParseError> {
        Ok(self.clone())
    }
}
