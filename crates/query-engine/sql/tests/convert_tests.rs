use indexmap::IndexMap;
use similar_asserts::assert_eq;

use query_engine_sql::sql::ast::*;
use query_engine_sql::sql::convert::select_to_sql;
use query_engine_sql::sql::dialect::Dialect;
use query_engine_sql::sql::helpers;
use query_engine_sql::sql::string::Param;

fn column(name: &str) -> Expression {
    Expression::ColumnReference(helpers::make_column(name.to_string()))
}

fn params(items: Vec<(&str, Param)>) -> IndexMap<String, Param> {
    items
        .into_iter()
        .map(|(name, param)| (name.to_string(), param))
        .collect()
}

/// SELECT [Name], [Type] FROM [Products] WHERE [Name] LIKE '%Tea%' ORDER BY [Id] DESC, top 20 skip 5
fn paged_products_select() -> Select {
    let mut select = helpers::table_select(helpers::make_table_reference("Products"));
    select.select_list = SelectList::SelectList(vec![
        SelectItem::Column(ColumnReference::Column(ColumnName("Name".to_string()))),
        SelectItem::Column(ColumnReference::Column(ColumnName("Type".to_string()))),
    ]);
    select.where_ = Where(Expression::BinaryOperation {
        left: Box::new(column("Name")),
        operator: BinaryOperator::Like,
        right: Box::new(Expression::Value(Value::String("%Tea%".to_string()))),
    });
    select.order_by = OrderBy {
        elements: vec![OrderByElement {
            target: column("Id"),
            direction: OrderByDirection::Desc,
        }],
    };
    select.limit = Limit {
        limit: Some(20),
        offset: Some(5),
    };
    select
}

#[test]
fn it_converts_simple_select() {
    let select = helpers::table_select(helpers::make_table_reference("Products"));
    let sql = select_to_sql(&select, Dialect::SqlServer);
    assert_eq!(sql.sql, "SELECT * FROM [Products]");
    assert!(sql.params.is_empty());
}

#[test]
fn it_quotes_schema_qualified_names() {
    let select = helpers::table_select(helpers::make_table_reference("dbo.Odd]Name"));
    assert_eq!(
        select_to_sql(&select, Dialect::SqlServer).sql,
        "SELECT * FROM [dbo].[Odd]]Name]"
    );
    let select = helpers::table_select(helpers::make_table_reference("public.odd\"name"));
    assert_eq!(
        select_to_sql(&select, Dialect::Postgres).sql,
        "SELECT * FROM \"public\".\"odd\"\"name\""
    );
}

#[test]
fn the_table_is_the_last_segment_of_a_dotted_name() {
    assert_eq!(
        helpers::make_table_reference("Sales.dbo.Orders"),
        TableReference::DBTable {
            schema: Some(SchemaName("Sales.dbo".to_string())),
            table: TableName("Orders".to_string()),
        }
    );
}

#[test]
fn it_pages_with_offset_fetch_on_sql_server() {
    let sql = select_to_sql(&paged_products_select(), Dialect::SqlServer);
    assert_eq!(
        sql.sql,
        "SELECT [Name], [Type] FROM [Products] WHERE [Name] LIKE @p0 ORDER BY [Id] DESC OFFSET @p1 ROWS FETCH NEXT @p2 ROWS ONLY"
    );
    assert_eq!(
        sql.params,
        params(vec![
            ("@p0", Param::String("%Tea%".to_string())),
            ("@p1", Param::Integer(5)),
            ("@p2", Param::Integer(20)),
        ])
    );
}

#[test]
fn it_pages_with_limit_offset_on_postgres() {
    let sql = select_to_sql(&paged_products_select(), Dialect::Postgres);
    assert_eq!(
        sql.sql,
        "SELECT \"Name\", \"Type\" FROM \"Products\" WHERE \"Name\" LIKE $1 ORDER BY \"Id\" DESC LIMIT $2 OFFSET $3"
    );
    assert_eq!(
        sql.params,
        params(vec![
            ("$1", Param::String("%Tea%".to_string())),
            ("$2", Param::Integer(20)),
            ("$3", Param::Integer(5)),
        ])
    );
}

#[test]
fn it_uses_top_for_a_lone_limit_on_sql_server() {
    let mut select = helpers::table_select(helpers::make_table_reference("Products"));
    select.limit.limit = Some(10);
    let sql = select_to_sql(&select, Dialect::SqlServer);
    assert_eq!(sql.sql, "SELECT TOP (@p0) * FROM [Products]");
    assert_eq!(sql.params, params(vec![("@p0", Param::Integer(10))]));
}

#[test]
fn it_orders_by_a_constant_when_offsetting_without_order() {
    let mut select = helpers::table_select(helpers::make_table_reference("Products"));
    select.limit.offset = Some(3);
    assert_eq!(
        select_to_sql(&select, Dialect::SqlServer).sql,
        "SELECT * FROM [Products] ORDER BY (SELECT 0) OFFSET @p0 ROWS"
    );
}

#[test]
fn it_hoists_with_clauses_out_of_derived_tables() {
    let raw = helpers::raw_sql_select(
        "SELECT * FROM [Products]".to_string(),
        helpers::make_table_alias("RawSql".to_string()),
    );
    let wrapped = helpers::wrap_select(raw, helpers::make_table_alias("apply".to_string()));
    assert_eq!(
        select_to_sql(&wrapped, Dialect::SqlServer).sql,
        "WITH [RawSql] AS (SELECT * FROM [Products]) SELECT * FROM (SELECT * FROM [RawSql]) AS [apply]"
    );
}

#[test]
fn it_renders_count_only_selects() {
    let mut select = helpers::table_select(helpers::make_table_reference("Products"));
    select.select_list = SelectList::Count;
    assert_eq!(
        select_to_sql(&select, Dialect::SqlServer).sql,
        "SELECT COUNT(*) AS [count] FROM [Products]"
    );
}

#[test]
fn it_keeps_nested_groups_and_binds_in_lists() {
    let mut select = helpers::table_select(helpers::make_table_reference("Products"));
    select.where_ = Where(Expression::Or {
        left: Box::new(Expression::UnaryOperation {
            expression: Box::new(column("Origin")),
            operator: UnaryOperator::IsNull,
        }),
        right: Box::new(Expression::Not(Box::new(
            Expression::BinaryArrayOperation {
                left: Box::new(column("Origin")),
                operator: BinaryArrayOperator::In,
                right: vec![
                    Expression::Value(Value::String("Canada".to_string())),
                    Expression::Value(Value::String("USA".to_string())),
                ],
            },
        ))),
    });
    let sql = select_to_sql(&select, Dialect::SqlServer);
    assert_eq!(
        sql.sql,
        "SELECT * FROM [Products] WHERE ([Origin] IS NULL OR NOT [Origin] IN (@p0, @p1))"
    );
    assert_eq!(
        sql.params,
        params(vec![
            ("@p0", Param::String("Canada".to_string())),
            ("@p1", Param::String("USA".to_string())),
        ])
    );
}

#[test]
fn it_renders_date_parts_per_dialect() {
    let mut select = helpers::table_select(helpers::make_table_reference("Orders"));
    select.where_ = Where(Expression::BinaryOperation {
        left: Box::new(Expression::DatePart {
            part: DatePart::Year,
            expression: Box::new(column("OrderDate")),
        }),
        operator: BinaryOperator::Equals,
        right: Box::new(Expression::Value(Value::Int8(1971))),
    });
    assert_eq!(
        select_to_sql(&select, Dialect::SqlServer).sql,
        "SELECT * FROM [Orders] WHERE DATEPART(YEAR, [OrderDate]) = @p0"
    );
    assert_eq!(
        select_to_sql(&select, Dialect::Postgres).sql,
        "SELECT * FROM \"Orders\" WHERE EXTRACT(YEAR FROM \"OrderDate\") = $1"
    );
}

#[test]
fn it_renders_aggregates_and_group_by() {
    let mut select = helpers::table_select(helpers::make_table_reference("Orders"));
    select.select_list = SelectList::SelectList(vec![
        SelectItem::Column(ColumnReference::Column(ColumnName("Country".to_string()))),
        SelectItem::Expression {
            expression: Expression::FunctionCall {
                function: Function::Sum,
                args: vec![column("Amount")],
            },
            alias: helpers::make_column_alias("Total".to_string()),
        },
        SelectItem::Expression {
            expression: Expression::Count(CountType::One),
            alias: helpers::make_column_alias("OrderCount".to_string()),
        },
    ]);
    select.group_by = GroupBy {
        elements: vec![column("Country")],
    };
    assert_eq!(
        select_to_sql(&select, Dialect::SqlServer).sql,
        "SELECT [Country], SUM([Amount]) AS [Total], COUNT(1) AS [OrderCount] FROM [Orders] GROUP BY [Country]"
    );
}
