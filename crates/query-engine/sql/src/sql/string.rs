//! Type definitions of a low-level SQL string representation.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::dialect::Dialect;

/// A low-level SQL string with its bound parameters, in the order they appear in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL {
    pub sql: String,
    pub params: IndexMap<String, Param>,
    dialect: Dialect,
}

/// A parameter for a parameterized query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
}

impl SQL {
    pub fn new(dialect: Dialect) -> SQL {
        SQL {
            sql: String::new(),
            params: IndexMap::new(),
            dialect,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append a SQL syntax string.
    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a SQL identifier, quoted for the dialect.
    pub fn append_identifier(&mut self, identifier: &str) {
        let quoted = self.dialect.quote_identifier(identifier);
        self.sql.push_str(&quoted);
    }

    /// Append a parameter placeholder and bind the value to it.
    pub fn append_param(&mut self, param: Param) {
        let name = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&name);
        self.params.insert(name, param);
    }
}
