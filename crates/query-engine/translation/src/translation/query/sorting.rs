//! Translate an ordering chain.

use odata_sql_models as models;
use query_engine_sql::sql;

use crate::translation::helpers::Env;

/// Translate each link of an ordering chain that orders by a property.
/// Links without a property reference are skipped and the chain carries on.
pub fn translate_order_by(env: &Env, order_by: &models::OrderByClause) -> sql::ast::OrderBy {
    let elements = order_by
        .iter()
        .filter_map(|link| match env.resolve_column(&link.expression) {
            Ok(column) => Some(sql::ast::OrderByElement {
                target: sql::ast::Expression::ColumnReference(column),
                direction: match link.direction {
                    models::OrderByDirection::Asc => sql::ast::OrderByDirection::Asc,
                    models::OrderByDirection::Desc => sql::ast::OrderByDirection::Desc,
                },
            }),
            Err(_) => {
                tracing::debug!(
                    "skipping an ordering by a {}",
                    link.expression.unwrap_convert().kind_name()
                );
                None
            }
        })
        .collect();
    sql::ast::OrderBy { elements }
}
