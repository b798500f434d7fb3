//! Handle `$select` and `$expand` translation.

use odata_sql_models as models;
use query_engine_sql::sql;

use crate::translation::error::Error;
use crate::translation::helpers::Env;

/// Translate the projection of a query onto its select.
///
/// Selected properties become columns. Expanded navigations become a `target.*` projection
/// joined on `target.id = source.target_id`. When everything is selected the wildcard
/// projection of the source is kept.
pub fn translate_fields(
    env: &Env,
    select: &mut sql::ast::Select,
    clause: &models::SelectExpandClause,
) -> Result<(), Error> {
    let mut items = vec![];
    let mut expanded = false;
    if clause.all_selected {
        items.push(sql::ast::SelectItem::Star);
    }

    for item in &clause.items {
        match item {
            models::SelectItem::Path { segments } if !clause.all_selected => {
                if let Some(segment) = segments.first() {
                    items.push(sql::ast::SelectItem::Column(sql::helpers::make_column(
                        env.unescape_name(segment),
                    )));
                }
            }
            models::SelectItem::Path { .. } => {}
            models::SelectItem::Expand {
                navigation,
                all_selected: true,
            } => {
                let source = select
                    .from
                    .as_ref()
                    .map(sql::helpers::source_reference)
                    .ok_or_else(|| {
                        Error::InvalidArgument(format!("cannot expand '{navigation}' without a source"))
                    })?;
                let (target, join) = translate_expand(env, source, navigation);
                items.push(sql::ast::SelectItem::StarFrom(target));
                select.joins.push(join);
                expanded = true;
            }
            models::SelectItem::Expand { navigation, .. } => {
                return Err(Error::NotSupported(format!(
                    "a partial selection of the expanded '{navigation}'"
                )))
            }
        }
    }

    // everything selected and nothing expanded keeps the source projection
    if expanded || (!clause.all_selected && !items.is_empty()) {
        select.select_list = sql::ast::SelectList::SelectList(items);
    }
    Ok(())
}

fn translate_expand(
    env: &Env,
    source: sql::ast::TableReference,
    navigation: &str,
) -> (sql::ast::TableReference, sql::ast::Join) {
    let navigation = env.unescape_name(navigation);
    let target = sql::helpers::make_table_reference(&navigation);
    let on = sql::ast::Expression::BinaryOperation {
        left: Box::new(sql::ast::Expression::ColumnReference(
            sql::ast::ColumnReference::TableColumn {
                table: target.clone(),
                name: sql::ast::ColumnName("id".to_string()),
            },
        )),
        operator: sql::ast::BinaryOperator::Equals,
        right: Box::new(sql::ast::Expression::ColumnReference(
            sql::ast::ColumnReference::TableColumn {
                table: source,
                name: sql::ast::ColumnName(format!("{navigation}_id")),
            },
        )),
    };
    let join = sql::ast::Join::InnerJoin(sql::ast::InnerJoin {
        reference: target.clone(),
        on,
    });
    (target, join)
}
