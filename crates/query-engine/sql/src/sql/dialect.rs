//! The SQL dialects we know how to render to.
//!
//! A dialect decides how identifiers are quoted, how parameters are named, and the handful of
//! constructs that have no common syntax (pagination and date part extraction).

use super::ast::{DatePart, Limit, OrderBy, ScalarType};
use super::string::{Param, SQL};

/// A target SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, enum_iterator::Sequence)]
pub enum Dialect {
    #[default]
    SqlServer,
    Postgres,
}

impl Dialect {
    /// Quote an identifier, escaping the closing quote character.
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::SqlServer => format!("[{}]", name.replace(']', "]]")),
            Dialect::Postgres => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// The name of the `index`th (zero-based) bound parameter as it appears in the SQL text.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::SqlServer => format!("@p{index}"),
            Dialect::Postgres => format!("${}", index + 1),
        }
    }

    /// Whether a lone LIMIT is expressed as `SELECT TOP (n)`.
    pub fn uses_top(self) -> bool {
        matches!(self, Dialect::SqlServer)
    }

    /// Render the opening of a date part extraction; the caller renders the argument and
    /// closes it with `)`.
    pub fn append_date_part_start(self, sql: &mut SQL, part: DatePart) {
        match self {
            Dialect::SqlServer => {
                sql.append_syntax("DATEPART(");
                sql.append_syntax(part.keyword());
                sql.append_syntax(", ");
            }
            Dialect::Postgres => {
                sql.append_syntax("EXTRACT(");
                sql.append_syntax(part.keyword());
                sql.append_syntax(" FROM ");
            }
        }
    }

    /// Render the pagination clauses that follow ORDER BY.
    pub fn append_limit(self, sql: &mut SQL, limit: &Limit, order_by: &OrderBy) {
        match self {
            Dialect::SqlServer => match (limit.limit, limit.offset) {
                // a lone limit was rendered as TOP
                (_, None) => {}
                (fetch, Some(offset)) => {
                    // OFFSET/FETCH is only valid after an ORDER BY
                    if order_by.elements.is_empty() {
                        sql.append_syntax(" ORDER BY (SELECT 0)");
                    }
                    sql.append_syntax(" OFFSET ");
                    sql.append_param(Param::Integer(i64::from(offset)));
                    sql.append_syntax(" ROWS");
                    if let Some(fetch) = fetch {
                        sql.append_syntax(" FETCH NEXT ");
                        sql.append_param(Param::Integer(i64::from(fetch)));
                        sql.append_syntax(" ROWS ONLY");
                    }
                }
            },
            Dialect::Postgres => {
                if let Some(limit) = limit.limit {
                    sql.append_syntax(" LIMIT ");
                    sql.append_param(Param::Integer(i64::from(limit)));
                }
                if let Some(offset) = limit.offset {
                    sql.append_syntax(" OFFSET ");
                    sql.append_param(Param::Integer(i64::from(offset)));
                }
            }
        }
    }
}

impl DatePart {
    pub fn keyword(self) -> &'static str {
        match self {
            DatePart::Year => "YEAR",
            DatePart::Month => "MONTH",
            DatePart::Day => "DAY",
            DatePart::Hour => "HOUR",
            DatePart::Minute => "MINUTE",
        }
    }
}

impl ScalarType {
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Date => "DATE",
            ScalarType::Time => "TIME",
        }
    }
}
