//! Ordering and projection clauses.

use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// One link of an ordering chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderByClause {
    pub expression: Expression,
    #[serde(default)]
    pub direction: OrderByDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then_by: Option<Box<OrderByClause>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderByDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderByClause {
    /// Build a chain from its links, first link first.
    pub fn chain(links: Vec<(Expression, OrderByDirection)>) -> Option<OrderByClause> {
        links
            .into_iter()
            .rev()
            .fold(None, |then_by, (expression, direction)| {
                Some(OrderByClause {
                    expression,
                    direction,
                    then_by: then_by.map(Box::new),
                })
            })
    }

    /// Iterate over the links of the chain.
    pub fn iter(&self) -> impl Iterator<Item = &OrderByClause> {
        std::iter::successors(Some(self), |clause| clause.then_by.as_deref())
    }
}

/// The combined `$select` / `$expand` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectExpandClause {
    /// True when every property of the entity is selected.
    pub all_selected: bool,
    #[serde(default)]
    pub items: Vec<SelectItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectItem {
    /// A selected property path, e.g. `Address/City`.
    Path { segments: Vec<String> },
    /// An expanded navigation property.
    #[serde(rename_all = "camelCase")]
    Expand {
        navigation: String,
        all_selected: bool,
    },
}
