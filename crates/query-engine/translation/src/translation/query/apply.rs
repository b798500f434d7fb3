//! Translate apply pipelines into nested selects.

use odata_sql_models as models;
use query_engine_sql::sql;

use super::aggregates;
use super::filtering;
use crate::translation::error::Error;
use crate::translation::helpers::{Env, State};

/// Where the next stage of a pipeline attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageContext {
    /// More conditions can be added to the current select.
    ChainableFilter,
    /// The previous stage changed the shape of the rows; the next stage reads them
    /// from a derived table.
    Materialized,
}

impl StageContext {
    fn after(stage: &models::Transformation) -> StageContext {
        match stage {
            models::Transformation::Filter { .. } => StageContext::ChainableFilter,
            _ => StageContext::Materialized,
        }
    }
}

/// Translate the stages of a pipeline, in order, on top of a select.
pub fn translate_apply(
    env: &Env,
    state: &mut State,
    select: sql::ast::Select,
    transformations: &[models::Transformation],
) -> Result<sql::ast::Select, Error> {
    let mut select = select;
    let mut context = StageContext::ChainableFilter;

    for stage in transformations {
        if context == StageContext::Materialized {
            select = sql::helpers::wrap_select(select, state.make_stage_alias());
        }
        tracing::debug!("apply stage: {}", stage.kind_name());

        match stage {
            models::Transformation::Aggregate(aggregate) => {
                select.select_list =
                    sql::ast::SelectList::SelectList(aggregates::translate_aggregate(env, aggregate)?);
                // a top-level aggregate ends the pipeline
                return Ok(select);
            }
            models::Transformation::GroupBy {
                grouping_properties,
                aggregate,
            } => translate_group_by(env, &mut select, grouping_properties, aggregate.as_ref())?,
            models::Transformation::Filter { expression } => {
                let predicate = filtering::translate_expression(env, expression)?;
                let sql::ast::Where(existing) = select.where_;
                select.where_ = sql::ast::Where(sql::helpers::and_where(existing, predicate));
            }
            models::Transformation::Compute { expressions } => {
                translate_compute(env, &mut select, expressions)?;
            }
            models::Transformation::Expand { .. } => {
                return Err(Error::NotSupported(
                    "the 'expand' transformation in an apply pipeline".to_string(),
                ))
            }
        }

        context = StageContext::after(stage);
    }

    Ok(select)
}

fn translate_group_by(
    env: &Env,
    select: &mut sql::ast::Select,
    grouping_properties: &[models::Expression],
    aggregate: Option<&models::Aggregate>,
) -> Result<(), Error> {
    let mut items = vec![];
    let mut keys = vec![];
    for property in grouping_properties {
        let column = env.resolve_column(property)?;
        items.push(sql::ast::SelectItem::Column(column.clone()));
        keys.push(sql::ast::Expression::ColumnReference(column));
    }
    if let Some(aggregate) = aggregate {
        items.extend(aggregates::translate_aggregate(env, aggregate)?);
    }
    select.select_list = sql::ast::SelectList::SelectList(items);
    select.group_by = sql::ast::GroupBy { elements: keys };
    Ok(())
}

/// Every column, plus one derived date part column per compute expression.
fn translate_compute(
    env: &Env,
    select: &mut sql::ast::Select,
    expressions: &[models::ComputeExpression],
) -> Result<(), Error> {
    let mut items = vec![sql::ast::SelectItem::Star];
    for compute in expressions {
        let expression = translate_compute_expression(env, &compute.expression)?.ok_or_else(|| {
            Error::NotSupported(format!("the compute expression '{}'", compute.alias))
        })?;
        items.push(sql::ast::SelectItem::Expression {
            expression,
            alias: sql::helpers::make_column_alias(compute.alias.clone()),
        });
    }
    select.select_list = sql::ast::SelectList::SelectList(items);
    Ok(())
}

/// Only date part extraction from a column can be computed.
fn translate_compute_expression(
    env: &Env,
    expression: &models::Expression,
) -> Result<Option<sql::ast::Expression>, Error> {
    match expression.unwrap_convert() {
        models::Expression::FunctionCall { name, arguments } => match filtering::date_part(name) {
            Some(part) => Ok(Some(sql::ast::Expression::DatePart {
                part,
                expression: Box::new(filtering::single_column_argument(env, name, arguments)?),
            })),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}
