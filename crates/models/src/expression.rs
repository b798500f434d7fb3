//! Filter expression trees.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A node of a filter expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    /// `left op right` for one of `eq`, `ne`, `gt`, `ge`, `lt`, `le`.
    Comparison {
        operator: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `left and right`, `left or right`.
    Logical {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `not operand`
    Not { operand: Box<Expression> },
    /// `left in right`
    In {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: Vec<Expression>,
    },
    Property {
        name: String,
        #[serde(default)]
        kind: PropertyKind,
    },
    Constant { value: Literal },
    /// `(item, item, ...)`
    Collection { items: Vec<Expression> },
    /// An implicit or explicit type conversion of `source`.
    #[serde(rename_all = "camelCase")]
    Convert {
        source: Box<Expression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_type: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalOperator {
    And,
    Or,
}

/// Whether a property is part of the entity's declared type or a dynamic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Declared,
    #[default]
    Open,
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    DateTimeOffset(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl Expression {
    /// The node underneath any conversion wrappers.
    pub fn unwrap_convert(&self) -> &Expression {
        match self {
            Expression::Convert { source, .. } => source.unwrap_convert(),
            other => other,
        }
    }

    /// A short name of the node kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Comparison { .. } => "comparison",
            Expression::Logical { .. } => "logical operator",
            Expression::Not { .. } => "not",
            Expression::In { .. } => "in",
            Expression::FunctionCall { .. } => "function call",
            Expression::Property { .. } => "property",
            Expression::Constant { .. } => "constant",
            Expression::Collection { .. } => "collection",
            Expression::Convert { .. } => "convert",
        }
    }

    pub fn property(name: impl Into<String>) -> Expression {
        Expression::Property {
            name: name.into(),
            kind: PropertyKind::Open,
        }
    }

    pub fn constant(value: Literal) -> Expression {
        Expression::Constant { value }
    }

    pub fn string(value: impl Into<String>) -> Expression {
        Expression::constant(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Expression {
        Expression::constant(Literal::Integer(value))
    }

    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Expression {
        Expression::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    pub fn compare(operator: ComparisonOperator, left: Expression, right: Expression) -> Expression {
        Expression::Comparison {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Expression {
        Expression::Logical {
            operator: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Expression {
        Expression::Logical {
            operator: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expression) -> Expression {
        Expression::Not {
            operand: Box::new(operand),
        }
    }
}
