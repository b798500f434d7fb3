//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WITH` clause.
pub fn empty_with() -> With {
    With {
        common_table_expressions: vec![],
    }
}

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    true_expr()
}

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// Empty `LIMIT` and `OFFSET` clauses.
pub fn empty_limit() -> Limit {
    Limit {
        limit: None,
        offset: None,
    }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// Conjoin an expression onto an existing `WHERE` expression.
pub fn and_where(existing: Expression, expression: Expression) -> Expression {
    if existing == true_expr() {
        expression
    } else {
        Expression::And {
            left: Box::new(existing),
            right: Box::new(expression),
        }
    }
}

// Aliasing //

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

/// Create table aliases using this function so we build everything in one place.
pub fn make_table_alias(name: String) -> TableAlias {
    TableAlias { name }
}

/// The alias of the single column a count-only query returns.
pub fn count_column_alias() -> ColumnAlias {
    make_column_alias("count".to_string())
}

/// A reference to a database table. A dotted name is read as `schema.table`; the table is the
/// last segment.
pub fn make_table_reference(name: &str) -> TableReference {
    match name.rsplit_once('.') {
        Some((schema, table)) => TableReference::DBTable {
            schema: Some(SchemaName(schema.to_string())),
            table: TableName(table.to_string()),
        },
        None => TableReference::DBTable {
            schema: None,
            table: TableName(name.to_string()),
        },
    }
}

/// An unqualified column.
pub fn make_column(name: String) -> ColumnReference {
    ColumnReference::Column(ColumnName(name))
}

// SELECTs //

/// Build a simple select * from a source.
pub fn star_select(from: From) -> Select {
    Select {
        with: empty_with(),
        select_list: SelectList::SelectStar,
        from: Some(from),
        joins: vec![],
        where_: Where(empty_where()),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a select * from a database table.
pub fn table_select(reference: TableReference) -> Select {
    star_select(From::Table {
        reference,
        alias: None,
    })
}

/// Embed a select as an aliased derived table of a new `SELECT *`.
/// The `WITH` clause of the inner select moves to the new outermost select.
pub fn wrap_select(mut select: Select, alias: TableAlias) -> Select {
    let with = std::mem::replace(&mut select.with, empty_with());
    let mut outer = star_select(From::Select {
        select: Box::new(select),
        alias,
    });
    outer.with = with;
    outer
}

/// Build a select * from a raw SQL fragment exposed as a common table expression.
pub fn raw_sql_select(raw_sql: String, alias: TableAlias) -> Select {
    let mut select = star_select(From::Table {
        reference: TableReference::AliasedTable(alias.clone()),
        alias: None,
    });
    select.with = With {
        common_table_expressions: vec![CommonTableExpression {
            alias,
            select: CTExpr::RawSql(vec![RawSql::RawText(raw_sql)]),
        }],
    };
    select
}

/// The name a select's source can be referred to by in its select list and joins.
pub fn source_reference(from: &From) -> TableReference {
    match from {
        From::Table {
            alias: Some(alias), ..
        }
        | From::Select { alias, .. } => TableReference::AliasedTable(alias.clone()),
        From::Table {
            reference,
            alias: None,
        } => reference.clone(),
    }
}
