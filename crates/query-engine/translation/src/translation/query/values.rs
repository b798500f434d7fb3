//! Handle the translation of literal values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use odata_sql_models as models;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Date-times carrying their own offset.
const OFFSET_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Date-times without an offset, read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// A constant operand after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Scalar(sql::ast::Value),
    Collection(Vec<sql::ast::Value>),
}

/// Normalize a constant operand: strings are trimmed and, when enabled, read as dates.
pub fn translate_constant(env: &Env, node: &models::Expression) -> Result<Constant, Error> {
    match node.unwrap_convert() {
        models::Expression::Constant { value } => Ok(Constant::Scalar(translate_literal(
            value,
            env.try_parse_dates(),
        ))),
        models::Expression::Collection { items } => items
            .iter()
            .map(|item| match item.unwrap_convert() {
                models::Expression::Constant { value } => {
                    Ok(translate_literal(value, env.try_parse_dates()))
                }
                other => Err(Error::NotSupported(format!(
                    "a {} inside a collection",
                    other.kind_name()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Constant::Collection),
        other => Err(Error::NotSupported(format!(
            "comparisons against a {}",
            other.kind_name()
        ))),
    }
}

/// Normalize a constant operand that must be a single value.
pub fn translate_scalar(env: &Env, node: &models::Expression) -> Result<sql::ast::Value, Error> {
    match translate_constant(env, node)? {
        Constant::Scalar(value) => Ok(value),
        Constant::Collection(_) => Err(Error::NotSupported(
            "a collection where a single value is expected".to_string(),
        )),
    }
}

/// The trimmed text of a constant used as a string function argument.
pub fn translate_string_argument(node: &models::Expression) -> Result<String, Error> {
    match node.unwrap_convert() {
        models::Expression::Constant { value } => match value {
            models::Literal::String(s) => Ok(s.trim().to_string()),
            models::Literal::Integer(i) => Ok(i.to_string()),
            models::Literal::Double(d) => Ok(d.to_string()),
            other => Err(Error::NotSupported(format!(
                "a {other:?} constant where a string is expected"
            ))),
        },
        other => Err(Error::NotSupported(format!(
            "a {} where a string constant is expected",
            other.kind_name()
        ))),
    }
}

/// Convert a literal to a SQL value.
pub fn translate_literal(literal: &models::Literal, try_parse_dates: bool) -> sql::ast::Value {
    match literal {
        models::Literal::Null => sql::ast::Value::Null,
        models::Literal::Boolean(b) => sql::ast::Value::Bool(*b),
        models::Literal::Integer(i) => sql::ast::Value::Int8(*i),
        models::Literal::Double(d) => sql::ast::Value::Float8(*d),
        models::Literal::String(s) => {
            let trimmed = s.trim();
            match try_parse_dates.then(|| parse_date_time(trimmed)).flatten() {
                Some(instant) => sql::ast::Value::DateTime(instant),
                None => sql::ast::Value::String(trimmed.to_string()),
            }
        }
        models::Literal::DateTimeOffset(instant) => {
            sql::ast::Value::DateTime(instant.with_timezone(&Utc))
        }
        models::Literal::Date(date) => match date.and_hms_opt(0, 0, 0) {
            Some(midnight) => sql::ast::Value::DateTime(Utc.from_utc_datetime(&midnight)),
            None => sql::ast::Value::String(date.to_string()),
        },
    }
}

/// Read a string as a point in time, assuming UTC when it carries no offset.
/// A bare time of day is placed on the current date.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Some(instant) = OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(instant.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight));
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
        .map(|time| Utc.from_utc_datetime(&Utc::now().date_naive().and_time(time)))
}
