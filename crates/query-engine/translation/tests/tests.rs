mod common;

#[test]
fn select_filter_order_paging() {
    let result = common::test_translation("select_filter_order_paging").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT [Name], [Price] FROM [Products] WHERE [Price] > @p0 ORDER BY [Name] ASC, [Price] DESC OFFSET @p1 ROWS FETCH NEXT @p2 ROWS ONLY

    @p0 = Integer(5)
    @p1 = Integer(20)
    @p2 = Integer(10)
    ");
}

#[test]
fn top_only() {
    let result = common::test_translation("top_only").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT TOP (@p0) * FROM [Products] WHERE [Name] = @p1

    @p0 = Integer(5)
    @p1 = String("Milk")
    "#);
}

#[test]
fn skip_without_order() {
    let result = common::test_translation("skip_without_order").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT * FROM [Products] ORDER BY (SELECT 0) OFFSET @p0 ROWS

    @p0 = Integer(3)
    ");
}

#[test]
fn order_by_skips_non_properties() {
    let result = common::test_translation("order_by_skips_non_properties").unwrap();
    insta::assert_snapshot!(result, @"SELECT * FROM [dbo].[Products] ORDER BY [Price] DESC");
}

#[test]
fn string_functions() {
    let result = common::test_translation("string_functions").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE ([Name] LIKE @p0 OR ([Name] LIKE @p1 AND [Category] LIKE @p2))

    @p0 = String("%Tea%")
    @p1 = String("Ch%")
    @p2 = String("%Drinks")
    "#);
}

#[test]
fn matches_pattern() {
    let result = common::test_translation("matches_pattern").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE [Name] LIKE @p0

    @p0 = String("Te%")
    "#);
}

#[test]
fn date_range() {
    let result = common::test_translation("date_range").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT * FROM [Orders] WHERE ([OrderDate] >= @p0 AND [OrderDate] < @p1)

    @p0 = DateTime(2020-06-01T04:00:00Z)
    @p1 = DateTime(2020-07-01T00:00:00Z)
    ");
}

#[test]
fn no_date_parsing() {
    let result = common::test_translation("no_date_parsing").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Orders] WHERE [OrderDate] >= @p0

    @p0 = String("2020-06-01T00:00-04:00")
    "#);
}

#[test]
fn case_insensitive() {
    let result = common::test_translation("case_insensitive").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE (LOWER([Name]) LIKE @p0 AND LOWER([Name]) LIKE @p1)

    @p0 = String("milk")
    @p1 = String("%tea%")
    "#);
}

#[test]
fn index_of() {
    let result = common::test_translation("index_of").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE (NOT [Name] LIKE @p0 OR [Name] LIKE @p1)

    @p0 = String("%Tea%")
    @p1 = String("%Milk%")
    "#);
}

#[test]
fn case_insensitive_index_of() {
    let result = common::test_translation("case_insensitive_index_of").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE NOT LOWER([Name]) LIKE @p0

    @p0 = String("%tea%")
    "#);
}

#[test]
fn negated_comparand() {
    let result = common::test_translation("negated_comparand").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT * FROM [Products] WHERE NOT [Price] > @p0

    @p0 = Integer(5)
    ");
}

#[test]
fn in_and_not_in() {
    let result = common::test_translation("in_and_not_in").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Customers] WHERE ([Name] IN (@p0, @p1) AND NOT [Origin] IN (@p2))

    @p0 = String("John")
    @p1 = String("Doe")
    @p2 = String("UK")
    "#);
}

#[test]
fn space_escape() {
    let result = common::test_translation("space_escape").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT [Unit Price] FROM [Products] WHERE [Unit Price] > @p0

    @p0 = Float(2.5)
    ");
}

#[test]
fn null_comparisons() {
    let result = common::test_translation("null_comparisons").unwrap();
    insta::assert_snapshot!(result, @"SELECT * FROM [Customers] WHERE ([Region] IS NULL AND NOT [Fax] IS NULL)");
}

#[test]
fn boolean_comparison() {
    let result = common::test_translation("boolean_comparison").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Products] WHERE NOT [Name] LIKE @p0

    @p0 = String("%Tea%")
    "#);
}

#[test]
fn apply_filter_groupby() {
    let result = common::test_translation("apply_filter_groupby").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT [Country], SUM([Amount]) AS [Total] FROM [Orders] WHERE [Amount] >= @p0 GROUP BY [Country]

    @p0 = Integer(100)
    ");
}

#[test]
fn apply_groupby_then_filter() {
    let result = common::test_translation("apply_groupby_then_filter").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT * FROM (SELECT [Country], SUM([Amount]) AS [Total] FROM [Orders] WHERE [Amount] >= @p0 GROUP BY [Country]) AS [stage_1] WHERE [Total] >= @p1

    @p0 = Integer(100)
    @p1 = Integer(20)
    ");
}

#[test]
fn apply_with_filter_and_select() {
    let result = common::test_translation("apply_with_filter_and_select").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT [Country] FROM (SELECT [Country], AVG([Amount]) AS [AvgAmount] FROM [Orders] GROUP BY [Country]) AS [apply] WHERE [AvgAmount] > @p0

    @p0 = Integer(50)
    ");
}

#[test]
fn aggregate_raw_sql() {
    let result = common::test_translation("aggregate_raw_sql").unwrap();
    insta::assert_snapshot!(result, @"WITH [RawSql] AS (SELECT * FROM Sales WHERE Year = 2020) SELECT SUM([Amount]) AS [Total], COUNT(1) AS [Rows], COUNT(DISTINCT [Customer]) AS [Customers] FROM [RawSql]");
}

#[test]
fn compute_then_groupby() {
    let result = common::test_translation("compute_then_groupby").unwrap();
    insta::assert_snapshot!(result, @"SELECT [OrderYear], SUM([Amount]) AS [Total] FROM (SELECT *, DATEPART(YEAR, [OrderDate]) AS [OrderYear] FROM [Orders]) AS [stage_1] GROUP BY [OrderYear]");
}

#[test]
fn date_functions() {
    let result = common::test_translation("date_functions").unwrap();
    insta::assert_snapshot!(result, @r#"
    SELECT * FROM [Orders] WHERE ((DATEPART(YEAR, [OrderDate]) = @p0 AND CAST([ShippedDate] AS DATE) = @p1) AND CAST([ShippedDate] AS TIME) < @p2)

    @p0 = Integer(1971)
    @p1 = String("2020-09-08")
    @p2 = String("16:30")
    "#);
}

#[test]
fn count_with_filter() {
    let result = common::test_translation("count_with_filter").unwrap();
    insta::assert_snapshot!(result, @r"
    SELECT COUNT(*) AS [count] FROM [Products] WHERE [Price] > @p0

    @p0 = Integer(5)
    ");
}

#[test]
fn count_over_apply() {
    let result = common::test_translation("count_over_apply").unwrap();
    insta::assert_snapshot!(result, @"SELECT COUNT(*) AS [count] FROM (SELECT [Country] FROM [Orders] GROUP BY [Country]) AS [apply]");
}

#[test]
fn expand_all() {
    let result = common::test_translation("expand_all").unwrap();
    insta::assert_snapshot!(result, @"SELECT *, [Customer].* FROM [Orders] INNER JOIN [Customer] ON [Customer].[id] = [Orders].[Customer_id]");
}

#[test]
fn select_and_expand() {
    let result = common::test_translation("select_and_expand").unwrap();
    insta::assert_snapshot!(result, @"SELECT [OrderId], [Address], [Customer].* FROM [Orders] INNER JOIN [Customer] ON [Customer].[id] = [Orders].[Customer_id]");
}

#[test]
fn translating_twice_gives_the_same_model() {
    let first = common::translate_request("apply_groupby_then_filter").unwrap();
    let second = common::translate_request("apply_groupby_then_filter").unwrap();
    similar_asserts::assert_eq!(first, second);
}

mod errors {
    use super::common;

    #[test]
    fn non_constant_comparand() {
        insta::assert_snapshot!(
            common::test_error("error_non_constant_comparand"),
            @"Queries containing comparisons against a property are not supported."
        );
    }

    #[test]
    fn not_of_property() {
        insta::assert_snapshot!(
            common::test_error("error_not_of_property"),
            @"Queries containing 'not' applied to a property are not supported."
        );
    }

    #[test]
    fn partial_expand() {
        insta::assert_snapshot!(
            common::test_error("error_partial_expand"),
            @"Queries containing a partial selection of the expanded 'Customer' are not supported."
        );
    }

    #[test]
    fn unsupported_compute() {
        insta::assert_snapshot!(
            common::test_error("error_unsupported_compute"),
            @"Queries containing the compute expression 'LowerName' are not supported."
        );
    }

    #[test]
    fn in_against_a_property() {
        insta::assert_snapshot!(
            common::test_error("error_in_against_property"),
            @"Queries containing 'in' against a property are not supported."
        );
    }

    #[test]
    fn custom_aggregate() {
        insta::assert_snapshot!(
            common::test_error("error_custom_aggregate"),
            @"Queries containing the aggregation method 'median' are not supported."
        );
    }

    #[test]
    fn empty_raw_sql() {
        insta::assert_snapshot!(
            common::test_error("error_empty_raw_sql"),
            @"Invalid argument: the raw SQL source must not be empty"
        );
    }

    #[test]
    fn three_part_table_name() {
        insta::assert_snapshot!(
            common::test_error("error_three_part_table_name"),
            @"Invalid argument: the table name 'Sales.dbo.Orders' has more than a schema and a table part"
        );
    }

    #[test]
    fn empty_table() {
        insta::assert_snapshot!(
            common::test_error("error_empty_table"),
            @"Invalid argument: the table name must not be empty"
        );
    }
}
