//! Handle filtering/where clauses translation.

use odata_sql_models as models;
use query_engine_sql::sql;

use super::values::{self, Constant};
use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Functions that are boolean predicates on their own.
const PREDICATE_FUNCTIONS: [&str; 4] = ["contains", "startswith", "endswith", "matchespattern"];

/// The kinds of LIKE patterns we build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternMatch {
    Contains,
    StartsWith,
    EndsWith,
    /// A glob in the `^...$` / `.*` notation
    Glob,
}

/// Translate a boolean expression into a predicate.
///
/// Every AND/OR node becomes its own group, so the nesting of the input is kept as is.
pub fn translate_expression(
    env: &Env,
    expression: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    match expression.unwrap_convert() {
        models::Expression::Logical {
            operator,
            left,
            right,
        } => {
            let left = Box::new(translate_expression(env, left)?);
            let right = Box::new(translate_expression(env, right)?);
            Ok(match operator {
                models::LogicalOperator::And => sql::ast::Expression::And { left, right },
                models::LogicalOperator::Or => sql::ast::Expression::Or { left, right },
            })
        }
        models::Expression::Comparison {
            operator,
            left,
            right,
        } => translate_comparison(env, *operator, left, right),
        models::Expression::FunctionCall { name, arguments } => {
            translate_predicate_function(env, name, arguments)
        }
        models::Expression::In { left, right } => translate_in(env, left, right),
        models::Expression::Not { operand } => translate_not(env, operand),
        other => Err(Error::NotSupported(format!(
            "a {} as a filter predicate",
            other.kind_name()
        ))),
    }
}

/// Does the node evaluate to a boolean on its own.
fn is_predicate(node: &models::Expression) -> bool {
    match node.unwrap_convert() {
        models::Expression::Comparison { .. }
        | models::Expression::Logical { .. }
        | models::Expression::Not { .. }
        | models::Expression::In { .. } => true,
        models::Expression::FunctionCall { name, .. } => PREDICATE_FUNCTIONS
            .iter()
            .any(|function| function.eq_ignore_ascii_case(name)),
        _ => false,
    }
}

fn negate(expression: sql::ast::Expression) -> sql::ast::Expression {
    sql::ast::Expression::Not(Box::new(expression))
}

fn translate_not(
    env: &Env,
    operand: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let operand = operand.unwrap_convert();
    match operand {
        models::Expression::FunctionCall { .. }
        | models::Expression::Comparison { .. }
        | models::Expression::In { .. }
        | models::Expression::Logical { .. }
        | models::Expression::Not { .. } => Ok(negate(translate_expression(env, operand)?)),
        other => Err(Error::NotSupported(format!(
            "'not' applied to a {}",
            other.kind_name()
        ))),
    }
}

fn translate_operator(operator: models::ComparisonOperator) -> sql::ast::BinaryOperator {
    match operator {
        models::ComparisonOperator::Eq => sql::ast::BinaryOperator::Equals,
        models::ComparisonOperator::Ne => sql::ast::BinaryOperator::NotEquals,
        models::ComparisonOperator::Gt => sql::ast::BinaryOperator::GreaterThan,
        models::ComparisonOperator::Ge => sql::ast::BinaryOperator::GreaterThanOrEqualTo,
        models::ComparisonOperator::Lt => sql::ast::BinaryOperator::LessThan,
        models::ComparisonOperator::Le => sql::ast::BinaryOperator::LessThanOrEqualTo,
    }
}

fn translate_comparison(
    env: &Env,
    operator: models::ComparisonOperator,
    left: &models::Expression,
    right: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let left = left.unwrap_convert();
    let right = right.unwrap_convert();

    // a `not` where a comparand is expected negates the whole comparison
    if let models::Expression::Not { operand } = left {
        return Ok(negate(translate_comparison(env, operator, operand, right)?));
    }

    if is_predicate(left) {
        return translate_boolean_comparison(env, operator, left, right);
    }

    match left {
        models::Expression::FunctionCall { name, arguments } => {
            translate_function_comparison(env, name, arguments, operator, right)
        }
        models::Expression::Property { .. } => {
            let column = sql::ast::Expression::ColumnReference(env.resolve_column(left)?);
            let value = values::translate_scalar(env, right)?;
            translate_value_comparison(column, operator, value)
        }
        other => Err(Error::NotSupported(format!(
            "a {} on the left side of a comparison",
            other.kind_name()
        ))),
    }
}

/// `predicate eq true` and friends.
fn translate_boolean_comparison(
    env: &Env,
    operator: models::ComparisonOperator,
    predicate: &models::Expression,
    right: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let expected = match (operator, right) {
        (
            models::ComparisonOperator::Eq | models::ComparisonOperator::Ne,
            models::Expression::Constant {
                value: models::Literal::Boolean(expected),
            },
        ) => *expected,
        _ => {
            return Err(Error::NotSupported(
                "comparing a condition with anything but a boolean constant using eq or ne"
                    .to_string(),
            ))
        }
    };
    let predicate = translate_expression(env, predicate)?;
    if (operator == models::ComparisonOperator::Eq) == expected {
        Ok(predicate)
    } else {
        Ok(negate(predicate))
    }
}

/// Compare a scalar expression with a normalized value.
fn translate_value_comparison(
    left: sql::ast::Expression,
    operator: models::ComparisonOperator,
    value: sql::ast::Value,
) -> Result<sql::ast::Expression, Error> {
    if value == sql::ast::Value::Null {
        let is_null = sql::ast::Expression::UnaryOperation {
            expression: Box::new(left),
            operator: sql::ast::UnaryOperator::IsNull,
        };
        return match operator {
            models::ComparisonOperator::Eq => Ok(is_null),
            models::ComparisonOperator::Ne => Ok(negate(is_null)),
            _ => Err(Error::NotSupported(
                "comparisons with null other than eq and ne".to_string(),
            )),
        };
    }
    Ok(sql::ast::Expression::BinaryOperation {
        left: Box::new(left),
        operator: translate_operator(operator),
        right: Box::new(sql::ast::Expression::Value(value)),
    })
}

/// Look up a date part extraction function by name.
pub fn date_part(name: &str) -> Option<sql::ast::DatePart> {
    enum_iterator::all::<sql::ast::DatePart>().find(|part| part.keyword().eq_ignore_ascii_case(name))
}

/// The column a single-argument function is applied to.
pub fn single_column_argument(
    env: &Env,
    function: &str,
    arguments: &[models::Expression],
) -> Result<sql::ast::Expression, Error> {
    match arguments {
        [argument] => Ok(sql::ast::Expression::ColumnReference(
            env.resolve_column(argument)?,
        )),
        _ => Err(Error::NotSupported(format!(
            "'{function}' with {} arguments",
            arguments.len()
        ))),
    }
}

/// A comparison whose left side is a function call, such as `year(OrderDate) eq 1971`.
fn translate_function_comparison(
    env: &Env,
    name: &str,
    arguments: &[models::Expression],
    operator: models::ComparisonOperator,
    right: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let function = name.to_ascii_lowercase();

    if let Some(part) = date_part(&function) {
        let column = single_column_argument(env, &function, arguments)?;
        let value = values::translate_scalar(env, right)?;
        return translate_value_comparison(
            sql::ast::Expression::DatePart {
                part,
                expression: Box::new(column),
            },
            operator,
            value,
        );
    }

    match function.as_str() {
        "date" | "time" => {
            let (r#type, format) = if function == "date" {
                (sql::ast::ScalarType::Date, "%Y-%m-%d")
            } else {
                (sql::ast::ScalarType::Time, "%H:%M")
            };
            let column = single_column_argument(env, &function, arguments)?;
            let value = match values::translate_scalar(env, right)? {
                sql::ast::Value::DateTime(instant) => {
                    sql::ast::Value::String(instant.format(format).to_string())
                }
                other => other,
            };
            translate_value_comparison(
                sql::ast::Expression::Cast {
                    expression: Box::new(column),
                    r#type,
                },
                operator,
                value,
            )
        }
        "toupper" | "tolower" => {
            let column = single_column_argument(env, &function, arguments)?;
            let text = values::translate_string_argument(right)?.to_lowercase();
            let like = sql::ast::Expression::BinaryOperation {
                left: Box::new(lower(column)),
                operator: sql::ast::BinaryOperator::Like,
                right: Box::new(sql::ast::Expression::Value(sql::ast::Value::String(text))),
            };
            match operator {
                models::ComparisonOperator::Eq => Ok(like),
                models::ComparisonOperator::Ne => Ok(negate(like)),
                _ => Err(Error::NotSupported(format!(
                    "'{function}' compared using an operator other than eq or ne"
                ))),
            }
        }
        "indexof" => {
            let [target, substring] = arguments else {
                return Err(Error::NotSupported(format!(
                    "'indexof' with {} arguments",
                    arguments.len()
                )));
            };
            let position = match values::translate_scalar(env, right)? {
                sql::ast::Value::Int8(position) => position,
                _ => {
                    return Err(Error::NotSupported(
                        "'indexof' compared with anything but an integer".to_string(),
                    ))
                }
            };
            let predicate = translate_pattern_match(env, PatternMatch::Contains, target, substring)?;
            // -1 means "not found"; `ne` flips that
            let absent = (position == -1) != (operator == models::ComparisonOperator::Ne);
            Ok(if absent { negate(predicate) } else { predicate })
        }
        _ => Err(Error::NotSupported(format!(
            "the function '{name}' in comparisons"
        ))),
    }
}

/// `contains(...)`, `startswith(...)`, `endswith(...)` and `matchespattern(...)`.
fn translate_predicate_function(
    env: &Env,
    name: &str,
    arguments: &[models::Expression],
) -> Result<sql::ast::Expression, Error> {
    let function = name.to_ascii_lowercase();
    let kind = match function.as_str() {
        "contains" => PatternMatch::Contains,
        "startswith" => PatternMatch::StartsWith,
        "endswith" => PatternMatch::EndsWith,
        "matchespattern" => PatternMatch::Glob,
        _ => {
            return Err(Error::NotSupported(format!(
                "the function '{name}' as a filter predicate"
            )))
        }
    };
    let [target, argument] = arguments else {
        return Err(Error::NotSupported(format!(
            "'{function}' with {} arguments",
            arguments.len()
        )));
    };
    translate_pattern_match(env, kind, target, argument)
}

fn lower(expression: sql::ast::Expression) -> sql::ast::Expression {
    sql::ast::Expression::FunctionCall {
        function: sql::ast::Function::Lower,
        args: vec![expression],
    }
}

/// The column a pattern is matched against. Wrapping it in `toupper`/`tolower`
/// makes the match case-insensitive.
fn translate_match_target(
    env: &Env,
    target: &models::Expression,
) -> Result<(sql::ast::Expression, bool), Error> {
    match target.unwrap_convert() {
        models::Expression::FunctionCall { name, arguments }
            if name.eq_ignore_ascii_case("toupper") || name.eq_ignore_ascii_case("tolower") =>
        {
            let column = single_column_argument(env, name, arguments)?;
            Ok((lower(column), true))
        }
        other => Ok((
            sql::ast::Expression::ColumnReference(env.resolve_column(other)?),
            false,
        )),
    }
}

fn translate_pattern_match(
    env: &Env,
    kind: PatternMatch,
    target: &models::Expression,
    argument: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let (column, case_insensitive) = translate_match_target(env, target)?;
    let text = values::translate_string_argument(argument)?;
    let text = if case_insensitive {
        text.to_lowercase()
    } else {
        text
    };
    let pattern = match kind {
        PatternMatch::Contains => format!("%{text}%"),
        PatternMatch::StartsWith => format!("{text}%"),
        PatternMatch::EndsWith => format!("%{text}"),
        PatternMatch::Glob => glob_to_like(&text),
    };
    Ok(sql::ast::Expression::BinaryOperation {
        left: Box::new(column),
        operator: sql::ast::BinaryOperator::Like,
        right: Box::new(sql::ast::Expression::Value(sql::ast::Value::String(
            pattern,
        ))),
    })
}

/// `^abc.*$` becomes `abc%`.
fn glob_to_like(glob: &str) -> String {
    let pattern = glob.replace(".*", "%");
    let pattern = pattern.strip_prefix('^').unwrap_or(&pattern);
    pattern.strip_suffix('$').unwrap_or(pattern).to_string()
}

fn translate_in(
    env: &Env,
    left: &models::Expression,
    right: &models::Expression,
) -> Result<sql::ast::Expression, Error> {
    let column = sql::ast::Expression::ColumnReference(env.resolve_column(left)?);
    let values = match right.unwrap_convert() {
        models::Expression::Collection { .. } => match values::translate_constant(env, right)? {
            Constant::Collection(values) => values,
            Constant::Scalar(_) => {
                return Err(Error::NotSupported(
                    "'in' against a single value".to_string(),
                ))
            }
        },
        other => {
            return Err(Error::NotSupported(format!(
                "'in' against a {}",
                other.kind_name()
            )))
        }
    };
    if values.is_empty() {
        return Err(Error::NotSupported(
            "'in' against an empty collection".to_string(),
        ));
    }
    Ok(sql::ast::Expression::BinaryArrayOperation {
        left: Box::new(column),
        operator: sql::ast::BinaryArrayOperator::In,
        right: values.into_iter().map(sql::ast::Expression::Value).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::glob_to_like;

    #[test]
    fn globs_become_like_patterns() {
        assert_eq!(glob_to_like("^Te.*$"), "Te%");
        assert_eq!(glob_to_like(".*Tea.*"), "%Tea%");
        assert_eq!(glob_to_like("Tea"), "Tea");
    }
}
