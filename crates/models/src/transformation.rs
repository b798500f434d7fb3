//! Apply pipelines: ordered transformation stages.

use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// One stage of an apply pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transformation {
    /// `filter(expression)`
    Filter { expression: Expression },
    /// `groupby((properties), aggregate(...))`
    #[serde(rename_all = "camelCase")]
    GroupBy {
        grouping_properties: Vec<Expression>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aggregate: Option<Aggregate>,
    },
    /// `aggregate(expression with method as alias, ...)`
    Aggregate(Aggregate),
    /// `compute(expression as alias, ...)`
    Compute { expressions: Vec<ComputeExpression> },
    /// `expand(navigation, ...)`
    Expand { navigation: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub expressions: Vec<AggregateExpression>,
}

/// `expression with method as alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateExpression {
    pub method: AggregationMethod,
    /// Absent for a plain row count (`$count as alias`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationMethod {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
    /// `$count`
    VirtualPropertyCount,
    Custom(String),
}

/// `expression as alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeExpression {
    pub expression: Expression,
    pub alias: String,
}

impl Transformation {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Transformation::Filter { .. } => "filter",
            Transformation::GroupBy { .. } => "groupby",
            Transformation::Aggregate(_) => "aggregate",
            Transformation::Compute { .. } => "compute",
            Transformation::Expand { .. } => "expand",
        }
    }
}
