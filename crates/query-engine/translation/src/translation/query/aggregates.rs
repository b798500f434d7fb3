//! Translate aggregate projections.

use odata_sql_models as models;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Translate the expressions of an aggregate into aliased select items.
pub fn translate_aggregate(
    env: &Env,
    aggregate: &models::Aggregate,
) -> Result<Vec<sql::ast::SelectItem>, Error> {
    aggregate
        .expressions
        .iter()
        .map(|expression| {
            Ok(sql::ast::SelectItem::Expression {
                expression: translate_aggregate_expression(env, expression)?,
                alias: sql::helpers::make_column_alias(expression.alias.clone()),
            })
        })
        .collect()
}

fn translate_aggregate_expression(
    env: &Env,
    aggregate: &models::AggregateExpression,
) -> Result<sql::ast::Expression, Error> {
    let column = || match &aggregate.expression {
        Some(expression) => env.resolve_column(expression),
        None => Err(Error::NotSupported(format!(
            "the aggregate '{}' without a property",
            aggregate.alias
        ))),
    };
    let function = |function: sql::ast::Function| -> Result<sql::ast::Expression, Error> {
        Ok(sql::ast::Expression::FunctionCall {
            function,
            args: vec![sql::ast::Expression::ColumnReference(column()?)],
        })
    };
    match &aggregate.method {
        models::AggregationMethod::Sum => function(sql::ast::Function::Sum),
        models::AggregationMethod::Min => function(sql::ast::Function::Min),
        models::AggregationMethod::Max => function(sql::ast::Function::Max),
        models::AggregationMethod::Average => function(sql::ast::Function::Avg),
        models::AggregationMethod::CountDistinct => Ok(sql::ast::Expression::Count(
            sql::ast::CountType::Distinct(column()?),
        )),
        models::AggregationMethod::VirtualPropertyCount => {
            Ok(sql::ast::Expression::Count(sql::ast::CountType::One))
        }
        models::AggregationMethod::Custom(method) => Err(Error::NotSupported(format!(
            "the aggregation method '{method}'"
        ))),
    }
}
