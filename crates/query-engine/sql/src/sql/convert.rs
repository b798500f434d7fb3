//! Convert a SQL AST to a low-level SQL string.

use super::ast::*;
use super::dialect::Dialect;
use super::helpers;
use super::string::{Param, SQL};

/// Render a SELECT in the given dialect.
pub fn select_to_sql(select: &Select, dialect: Dialect) -> SQL {
    let mut sql = SQL::new(dialect);
    select.to_sql(&mut sql);
    sql
}

// Convert to SQL strings

impl With {
    pub fn to_sql(&self, sql: &mut SQL) {
        if self.common_table_expressions.is_empty() {
            return;
        }
        sql.append_syntax("WITH ");
        for (index, cte) in self.common_table_expressions.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            cte.to_sql(sql);
        }
        sql.append_syntax(" ");
    }
}

impl CommonTableExpression {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.alias.to_sql(sql);
        sql.append_syntax(" AS (");
        self.select.to_sql(sql);
        sql.append_syntax(")");
    }
}

impl CTExpr {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            CTExpr::RawSql(raw_vec) => {
                for item in raw_vec {
                    item.to_sql(sql);
                }
            }
        }
    }
}

impl RawSql {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            RawSql::RawText(text) => sql.append_syntax(text),
        }
    }
}

impl SelectList {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectList::SelectList(select_list) => {
                for (index, item) in select_list.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(", ");
                    }
                    item.to_sql(sql);
                }
            }
            SelectList::SelectStar => {
                sql.append_syntax("*");
            }
            SelectList::Count => {
                Expression::Count(CountType::Star).to_sql(sql);
                sql.append_syntax(" AS ");
                helpers::count_column_alias().to_sql(sql);
            }
        }
    }
}

impl SelectItem {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            SelectItem::Star => sql.append_syntax("*"),
            SelectItem::StarFrom(table) => {
                table.to_sql(sql);
                sql.append_syntax(".*");
            }
            SelectItem::Column(column) => column.to_sql(sql),
            SelectItem::Expression { expression, alias } => {
                expression.to_sql(sql);
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
        }
    }
}

impl Select {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.with.to_sql(sql);

        sql.append_syntax("SELECT ");

        if sql.dialect().uses_top() && self.limit.offset.is_none() {
            if let Some(limit) = self.limit.limit {
                sql.append_syntax("TOP (");
                sql.append_param(Param::Integer(i64::from(limit)));
                sql.append_syntax(") ");
            }
        }

        self.select_list.to_sql(sql);

        if let Some(from) = &self.from {
            sql.append_syntax(" ");
            from.to_sql(sql);
        }

        for join in &self.joins {
            join.to_sql(sql);
        }

        self.where_.to_sql(sql);

        self.group_by.to_sql(sql);

        self.order_by.to_sql(sql);

        let dialect = sql.dialect();
        dialect.append_limit(sql, &self.limit, &self.order_by);
    }
}

impl From {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_syntax("FROM ");
        match &self {
            From::Table { reference, alias } => {
                reference.to_sql(sql);
                if let Some(alias) = alias {
                    sql.append_syntax(" AS ");
                    alias.to_sql(sql);
                }
            }
            From::Select { select, alias } => {
                sql.append_syntax("(");
                select.to_sql(sql);
                sql.append_syntax(")");
                sql.append_syntax(" AS ");
                alias.to_sql(sql);
            }
        }
    }
}

impl Join {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            Join::InnerJoin(join) => {
                sql.append_syntax(" INNER JOIN ");
                join.reference.to_sql(sql);
                sql.append_syntax(" ON ");
                join.on.to_sql(sql);
            }
        }
    }
}

impl Where {
    pub fn to_sql(&self, sql: &mut SQL) {
        let Where(expression) = self;
        if *expression != helpers::true_expr() {
            sql.append_syntax(" WHERE ");
            expression.to_sql(sql);
        }
    }
}

impl GroupBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" GROUP BY ");
            for (index, element) in self.elements.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                element.to_sql(sql);
            }
        }
    }
}

// scalars
impl Expression {
    pub fn to_sql(&self, sql: &mut SQL) {
        match &self {
            Expression::ColumnReference(column_reference) => column_reference.to_sql(sql),
            Expression::Value(value) => value.to_sql(sql),
            Expression::And { left, right } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                sql.append_syntax(" AND ");
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Or { left, right } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                sql.append_syntax(" OR ");
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Not(expr) => {
                sql.append_syntax("NOT ");
                expr.to_sql(sql);
            }
            Expression::BinaryOperation {
                left,
                operator,
                right,
            } => {
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
            }
            Expression::BinaryArrayOperation {
                left,
                operator,
                right,
            } => {
                left.to_sql(sql);
                operator.to_sql(sql);
                sql.append_syntax("(");
                for (index, item) in right.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(", ");
                    }
                    item.to_sql(sql);
                }
                sql.append_syntax(")");
            }
            Expression::UnaryOperation {
                expression,
                operator,
            } => {
                expression.to_sql(sql);
                operator.to_sql(sql);
            }
            Expression::FunctionCall { function, args } => {
                function.to_sql(sql);
                sql.append_syntax("(");
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        sql.append_syntax(", ");
                    }
                    arg.to_sql(sql);
                }
                sql.append_syntax(")");
            }
            Expression::DatePart { part, expression } => {
                let dialect = sql.dialect();
                dialect.append_date_part_start(sql, *part);
                expression.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Cast { expression, r#type } => {
                sql.append_syntax("CAST(");
                expression.to_sql(sql);
                sql.append_syntax(" AS ");
                sql.append_syntax(r#type.keyword());
                sql.append_syntax(")");
            }
            Expression::Count(count_type) => {
                sql.append_syntax("COUNT");
                sql.append_syntax("(");
                count_type.to_sql(sql);
                sql.append_syntax(")");
            }
        }
    }
}

impl UnaryOperator {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            UnaryOperator::IsNull => sql.append_syntax(" IS NULL"),
        }
    }
}

impl BinaryOperator {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            BinaryOperator::Equals => sql.append_syntax(" = "),
            BinaryOperator::NotEquals => sql.append_syntax(" <> "),
            BinaryOperator::GreaterThan => sql.append_syntax(" > "),
            BinaryOperator::GreaterThanOrEqualTo => sql.append_syntax(" >= "),
            BinaryOperator::LessThan => sql.append_syntax(" < "),
            BinaryOperator::LessThanOrEqualTo => sql.append_syntax(" <= "),
            BinaryOperator::Like => sql.append_syntax(" LIKE "),
        }
    }
}

impl BinaryArrayOperator {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            BinaryArrayOperator::In => sql.append_syntax(" IN "),
        }
    }
}

impl Function {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            Function::Lower => sql.append_syntax("LOWER"),
            Function::Sum => sql.append_syntax("SUM"),
            Function::Min => sql.append_syntax("MIN"),
            Function::Max => sql.append_syntax("MAX"),
            Function::Avg => sql.append_syntax("AVG"),
        }
    }
}

impl CountType {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            CountType::Star => sql.append_syntax("*"),
            CountType::One => sql.append_syntax("1"),
            CountType::Distinct(column) => {
                sql.append_syntax("DISTINCT ");
                column.to_sql(sql);
            }
        }
    }
}

impl Value {
    pub fn to_sql(&self, sql: &mut SQL) {
        match &self {
            Value::String(s) => sql.append_param(Param::String(s.clone())),
            Value::Int8(i) => sql.append_param(Param::Integer(*i)),
            Value::Float8(f) => sql.append_param(Param::Float(*f)),
            Value::Bool(b) => sql.append_param(Param::Boolean(*b)),
            Value::DateTime(instant) => sql.append_param(Param::DateTime(*instant)),
            Value::Null => sql.append_syntax("NULL"),
        }
    }
}

impl OrderBy {
    pub fn to_sql(&self, sql: &mut SQL) {
        if !self.elements.is_empty() {
            sql.append_syntax(" ORDER BY ");
            for (index, order_by_item) in self.elements.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                order_by_item.to_sql(sql);
            }
        }
    }
}

impl OrderByElement {
    pub fn to_sql(&self, sql: &mut SQL) {
        self.target.to_sql(sql);
        self.direction.to_sql(sql);
    }
}

impl OrderByDirection {
    pub fn to_sql(self, sql: &mut SQL) {
        match self {
            OrderByDirection::Asc => sql.append_syntax(" ASC"),
            OrderByDirection::Desc => sql.append_syntax(" DESC"),
        }
    }
}

// names
impl TableReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            TableReference::DBTable { schema, table } => {
                if let Some(SchemaName(schema)) = schema {
                    sql.append_identifier(schema);
                    sql.append_syntax(".");
                }
                let TableName(table) = table;
                sql.append_identifier(table);
            }
            TableReference::AliasedTable(alias) => alias.to_sql(sql),
        };
    }
}

impl TableAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}

impl ColumnReference {
    pub fn to_sql(&self, sql: &mut SQL) {
        match self {
            ColumnReference::Column(ColumnName(name)) => sql.append_identifier(name),
            ColumnReference::TableColumn {
                table,
                name: ColumnName(name),
            } => {
                table.to_sql(sql);
                sql.append_syntax(".");
                sql.append_identifier(name);
            }
        };
    }
}

impl ColumnAlias {
    pub fn to_sql(&self, sql: &mut SQL) {
        sql.append_identifier(&self.name);
    }
}
