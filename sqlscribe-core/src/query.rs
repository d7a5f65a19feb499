//! The fluent query builder.
//!
//! A [`Query`] owns a linear chain of clause nodes and the dialect that
//! polices it. Every clause method validates its input, asks the dialect
//! whether the new clause may follow the current tail, and only then appends.
//! A failed call leaves the chain exactly as it was.
//!
//! ```
//! use sqlscribe_core::QueryRegistry;
//!
//! let mut query = QueryRegistry::get_builder("mysql").unwrap();
//! let sql = query
//!     .select(["test_column", "another_test_column"]).unwrap()
//!     .from_("test_table").unwrap()
//!     .build();
//! assert_eq!(sql, "SELECT `test_column`,`another_test_column` FROM `test_table`");
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::column::{Column, Expression, ExpressionColumn};
use crate::dialect::Dialect;
use crate::ident::{self, TokenShape};
use crate::node::{JoinKind, Node, NodeKind};
use crate::render::render_chain;
use crate::value::Value;
use crate::{Error, Result};

/// Column arguments for `select`, `group_by`, `order_by`, `insert`, and
/// `returning`. Implemented for single tokens, string collections, and
/// column objects.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for () {
    fn into_columns(self) -> Vec<String> {
        Vec::new()
    }
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Column {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for &Column {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for ExpressionColumn {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|token| token.to_string()).collect()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|token| token.to_string()).collect()
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|token| token.to_string()).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoColumns for [String; N] {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().collect()
    }
}

impl IntoColumns for Vec<Column> {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(Column::to_string).collect()
    }
}

impl IntoColumns for &[Column] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(Column::to_string).collect()
    }
}

/// Condition arguments for `where_` and `having`. Multiple conditions are
/// folded left-to-right with ` AND ` into a single clause.
pub trait IntoConditions {
    fn into_conditions(self) -> Vec<String>;
}

impl IntoConditions for &str {
    fn into_conditions(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoConditions for String {
    fn into_conditions(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoConditions for Expression {
    fn into_conditions(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoConditions for &Expression {
    fn into_conditions(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl<const N: usize> IntoConditions for [&str; N] {
    fn into_conditions(self) -> Vec<String> {
        self.iter().map(|condition| condition.to_string()).collect()
    }
}

impl IntoConditions for Vec<&str> {
    fn into_conditions(self) -> Vec<String> {
        self.into_iter()
            .map(|condition| condition.to_string())
            .collect()
    }
}

impl IntoConditions for Vec<String> {
    fn into_conditions(self) -> Vec<String> {
        self
    }
}

impl<const N: usize> IntoConditions for [String; N] {
    fn into_conditions(self) -> Vec<String> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoConditions for [Expression; N] {
    fn into_conditions(self) -> Vec<String> {
        self.iter().map(Expression::to_string).collect()
    }
}

impl IntoConditions for Vec<Expression> {
    fn into_conditions(self) -> Vec<String> {
        self.iter().map(Expression::to_string).collect()
    }
}

/// A `FROM` source: one or more table tokens, or a nested query rendered in
/// parentheses.
pub trait IntoSource {
    fn into_source(self, query: &Query) -> Result<String>;
}

impl IntoSource for &str {
    fn into_source(self, query: &Query) -> Result<String> {
        query.resolve_columns(vec![self.to_string()])
    }
}

impl IntoSource for String {
    fn into_source(self, query: &Query) -> Result<String> {
        query.resolve_columns(vec![self])
    }
}

impl<const N: usize> IntoSource for [&str; N] {
    fn into_source(self, query: &Query) -> Result<String> {
        query.resolve_columns(self.iter().map(|token| token.to_string()).collect())
    }
}

impl IntoSource for Vec<&str> {
    fn into_source(self, query: &Query) -> Result<String> {
        query.resolve_columns(self.into_iter().map(|token| token.to_string()).collect())
    }
}

impl IntoSource for &Query {
    fn into_source(self, _query: &Query) -> Result<String> {
        Ok(format!("({})", self.to_sql()))
    }
}

/// The subordinate side of a combinator: a built query or raw SQL text,
/// taken verbatim with no re-escaping.
pub trait IntoQuerySql {
    fn into_query_sql(self) -> String;
}

impl IntoQuerySql for &str {
    fn into_query_sql(self) -> String {
        self.to_string()
    }
}

impl IntoQuerySql for String {
    fn into_query_sql(self) -> String {
        self
    }
}

impl IntoQuerySql for &Query {
    fn into_query_sql(self) -> String {
        self.to_sql()
    }
}

/// One row of insert values
pub trait IntoRow {
    fn into_row(self) -> Vec<Value>;
}

impl IntoRow for Vec<Value> {
    fn into_row(self) -> Vec<Value> {
        self
    }
}

impl<A: Into<Value>> IntoRow for (A,) {
    fn into_row(self) -> Vec<Value> {
        vec![self.0.into()]
    }
}

impl<A: Into<Value>, B: Into<Value>> IntoRow for (A, B) {
    fn into_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into()]
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> IntoRow for (A, B, C) {
    fn into_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into()]
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> IntoRow for (A, B, C, D) {
    fn into_row(self) -> Vec<Value> {
        vec![self.0.into(), self.1.into(), self.2.into(), self.3.into()]
    }
}

/// One or more rows of insert values: a single tuple, or a collection of
/// rows.
pub trait IntoRows {
    fn into_rows(self) -> Vec<Vec<Value>>;
}

impl<A: Into<Value>> IntoRows for (A,) {
    fn into_rows(self) -> Vec<Vec<Value>> {
        vec![self.into_row()]
    }
}

impl<A: Into<Value>, B: Into<Value>> IntoRows for (A, B) {
    fn into_rows(self) -> Vec<Vec<Value>> {
        vec![self.into_row()]
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> IntoRows for (A, B, C) {
    fn into_rows(self) -> Vec<Vec<Value>> {
        vec![self.into_row()]
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> IntoRows for (A, B, C, D) {
    fn into_rows(self) -> Vec<Vec<Value>> {
        vec![self.into_row()]
    }
}

impl<R: IntoRow> IntoRows for Vec<R> {
    fn into_rows(self) -> Vec<Vec<Value>> {
        self.into_iter().map(IntoRow::into_row).collect()
    }
}

impl<R: IntoRow, const N: usize> IntoRows for [R; N] {
    fn into_rows(self) -> Vec<Vec<Value>> {
        self.into_iter().map(IntoRow::into_row).collect()
    }
}

/// A mutable SQL statement builder bound to one dialect.
///
/// Obtain one from [`QueryRegistry::get_builder`](crate::QueryRegistry) or a
/// dialect shorthand such as [`Query::mysql`]. Builders are independent
/// values; cloning one never shares chain state.
#[derive(Debug, Clone)]
pub struct Query {
    chain: Vec<Node>,
    dialect: &'static dyn Dialect,
    escape_identifiers: bool,
}

impl Query {
    pub fn new(dialect: &'static dyn Dialect) -> Self {
        Query {
            chain: Vec::new(),
            dialect,
            escape_identifiers: true,
        }
    }

    pub fn mysql() -> Self {
        Query::new(&crate::dialect::MySqlDialect)
    }

    pub fn postgres() -> Self {
        Query::new(&crate::dialect::PostgresDialect)
    }

    pub fn sqlite() -> Self {
        Query::new(&crate::dialect::SqliteDialect)
    }

    pub fn oracle() -> Self {
        Query::new(&crate::dialect::OracleDialect)
    }

    /// The name of the dialect this builder is bound to
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Escape an identifier the way this builder currently would: wrapped in
    /// the dialect's quoting characters, or verbatim when escaping is off.
    pub fn escape_identifier(&self, identifier: &str) -> String {
        if ident::escaping_enabled(self.escape_identifiers) {
            self.dialect.escape_identifier(identifier)
        } else {
            identifier.to_string()
        }
    }

    /// Turn identifier escaping off for subsequent clauses.
    ///
    /// Clauses already appended keep the escaping that was in force when
    /// they were added.
    pub fn disable_escape_identifiers(&mut self) -> &mut Self {
        self.escape_identifiers = false;
        self
    }

    /// Turn identifier escaping back on for subsequent clauses
    pub fn enable_escape_identifiers(&mut self) -> &mut Self {
        self.escape_identifiers = true;
        self
    }

    /// Start a `SELECT` statement. Only legal as the first clause. No
    /// arguments (or a leading `*`) selects everything.
    pub fn select(&mut self, columns: impl IntoColumns) -> Result<&mut Self> {
        let columns = self.resolve_select_columns(columns.into_columns())?;
        self.append(Node::Select { columns })
    }

    /// `SELECT *`
    pub fn select_all(&mut self) -> Result<&mut Self> {
        self.select(())
    }

    /// Append a `FROM` clause: table names, or a nested query rendered in
    /// parentheses.
    pub fn from_(&mut self, source: impl IntoSource) -> Result<&mut Self> {
        let source = source.into_source(self)?;
        self.append(Node::From { source })
    }

    /// Append a join of the given kind. Natural and cross joins must not
    /// carry a condition; every other kind must.
    pub fn join(
        &mut self,
        table: &str,
        kind: JoinKind,
        condition: Option<&str>,
    ) -> Result<&mut Self> {
        let table = self.resolve_columns(vec![table.to_string()])?;
        let node = Node::join(kind, table, condition.map(|text| text.to_string()))?;
        self.append(node)
    }

    pub fn inner_join(&mut self, table: &str, condition: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Inner, Some(condition))
    }

    pub fn outer_join(&mut self, table: &str, condition: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Outer, Some(condition))
    }

    pub fn left_join(&mut self, table: &str, condition: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Left, Some(condition))
    }

    pub fn right_join(&mut self, table: &str, condition: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Right, Some(condition))
    }

    pub fn cross_join(&mut self, table: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Cross, None)
    }

    pub fn natural_join(&mut self, table: &str) -> Result<&mut Self> {
        self.join(table, JoinKind::Natural, None)
    }

    /// Append a `WHERE` clause. Multiple conditions merge into one clause
    /// joined with ` AND `. Condition text is taken verbatim, never escaped.
    pub fn where_(&mut self, conditions: impl IntoConditions) -> Result<&mut Self> {
        let conditions = merge_conditions(conditions.into_conditions())?;
        self.append(Node::Where { conditions })
    }

    /// Append a `HAVING` clause; conditions merge like [`Query::where_`]
    pub fn having(&mut self, conditions: impl IntoConditions) -> Result<&mut Self> {
        let conditions = merge_conditions(conditions.into_conditions())?;
        self.append(Node::Having { conditions })
    }

    pub fn group_by(&mut self, columns: impl IntoColumns) -> Result<&mut Self> {
        let columns = self.resolve_required_columns(columns.into_columns())?;
        self.append(Node::GroupBy { columns })
    }

    pub fn order_by(&mut self, columns: impl IntoColumns) -> Result<&mut Self> {
        let columns = self.resolve_required_columns(columns.into_columns())?;
        self.append(Node::OrderBy { columns })
    }

    /// Cap the result set. Renders as `LIMIT n`, or as
    /// `FETCH NEXT n ROWS ONLY` where the dialect paginates that way.
    pub fn limit(&mut self, count: u64) -> Result<&mut Self> {
        self.append(self.dialect.limit_node(count))
    }

    pub fn offset(&mut self, count: u64) -> Result<&mut Self> {
        self.append(Node::Offset { count })
    }

    /// `UNION` with a nested query or raw SQL text
    pub fn union(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Union {
            query: query.into_query_sql(),
            all: false,
        })
    }

    /// `UNION ALL` with a nested query or raw SQL text
    pub fn union_all(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Union {
            query: query.into_query_sql(),
            all: true,
        })
    }

    /// `EXCEPT` with a nested query or raw SQL text
    pub fn except_(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Except {
            query: query.into_query_sql(),
            all: false,
        })
    }

    /// `EXCEPT ALL` with a nested query or raw SQL text
    pub fn except_all(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Except {
            query: query.into_query_sql(),
            all: true,
        })
    }

    /// `INTERSECT` with a nested query or raw SQL text
    pub fn intersect(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Intersect {
            query: query.into_query_sql(),
            all: false,
        })
    }

    /// `INTERSECT ALL` with a nested query or raw SQL text
    pub fn intersect_all(&mut self, query: impl IntoQuerySql) -> Result<&mut Self> {
        self.append(Node::Intersect {
            query: query.into_query_sql(),
            all: true,
        })
    }

    /// Start an `INSERT` statement. Only legal as the first clause.
    ///
    /// With no columns the column list is omitted from the output. Every
    /// row's length must match the column count, or the call fails with
    /// [`Error::ArityMismatch`] and the builder stays empty.
    pub fn insert(
        &mut self,
        table: &str,
        columns: impl IntoColumns,
        rows: impl IntoRows,
    ) -> Result<&mut Self> {
        let column_tokens = columns.into_columns();
        let expected = column_tokens.len();
        let rows = rows.into_rows();
        if rows.is_empty() {
            return Err(Error::unsupported_operand(
                "insert requires at least one row of values",
            ));
        }
        if expected > 0 {
            for row in &rows {
                if row.len() != expected {
                    return Err(Error::ArityMismatch {
                        expected,
                        found: row.len(),
                    });
                }
            }
        }
        let columns = if column_tokens.is_empty() {
            String::new()
        } else {
            self.resolve_columns(column_tokens)?
        };
        let table = self.resolve_columns(vec![table.to_string()])?;
        let rows = rows
            .iter()
            .map(|row| {
                format!(
                    "({})",
                    row.iter()
                        .map(Value::to_literal)
                        .collect::<Vec<_>>()
                        .join(",")
                )
            })
            .collect();
        self.append(Node::Insert {
            table,
            columns,
            rows,
        })
    }

    /// Append a `RETURNING` clause; no arguments returns everything (`*`)
    pub fn returning(&mut self, columns: impl IntoColumns) -> Result<&mut Self> {
        let columns = self.resolve_select_columns(columns.into_columns())?;
        self.append(Node::Returning { columns })
    }

    /// Render the statement and clear the builder for reuse
    pub fn build(&mut self) -> String {
        let sql = render_chain(&self.chain);
        debug!(dialect = self.dialect.name(), %sql, "built statement");
        self.chain.clear();
        sql
    }

    /// Render the statement without clearing the builder. Calling this twice
    /// in a row returns identical text.
    pub fn to_sql(&self) -> String {
        render_chain(&self.chain)
    }

    fn append(&mut self, node: Node) -> Result<&mut Self> {
        match self.chain.last() {
            Some(tail) => self.dialect.validate_transition(tail.kind(), node.kind())?,
            None => {
                let kind = node.kind();
                if kind != NodeKind::Select && kind != NodeKind::Insert {
                    return Err(Error::invalid_transition(
                        self.dialect.name(),
                        "an empty statement",
                        kind.to_string(),
                    ));
                }
            }
        }
        trace!(dialect = self.dialect.name(), kind = %node.kind(), "appended clause");
        self.chain.push(node);
        Ok(self)
    }

    /// Column-list resolution where an empty list (or a leading `*`) means
    /// everything
    fn resolve_select_columns(&self, tokens: Vec<String>) -> Result<String> {
        match tokens.first() {
            None => Ok("*".to_string()),
            Some(first) if first == "*" => Ok("*".to_string()),
            Some(_) => self.resolve_columns(tokens),
        }
    }

    /// Column-list resolution for clauses that cannot be empty
    fn resolve_required_columns(&self, tokens: Vec<String>) -> Result<String> {
        if tokens.is_empty() {
            return Err(Error::invalid_identifier(""));
        }
        self.resolve_columns(tokens)
    }

    /// Validate, escape, and comma-join a list of identifier tokens. Each
    /// token may carry an ` AS alias` suffix; aliases are validated but
    /// never escaped. Function calls and arithmetic expressions render
    /// verbatim.
    fn resolve_columns(&self, tokens: Vec<String>) -> Result<String> {
        let resolved = tokens
            .iter()
            .map(|token| self.resolve_token(token))
            .collect::<Result<Vec<_>>>()?;
        Ok(resolved.join(","))
    }

    fn resolve_token(&self, token: &str) -> Result<String> {
        let (base, alias) = ident::split_alias(token);
        if let Some(alias) = alias {
            ident::validate_alias(alias)?;
        }
        let rendered = match ident::classify(base)? {
            TokenShape::Plain => self.escape_identifier(base),
            TokenShape::Wildcard | TokenShape::Verbatim => base.to_string(),
        };
        Ok(match alias {
            Some(alias) => format!("{rendered} AS {alias}"),
            None => rendered,
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

fn merge_conditions(conditions: Vec<String>) -> Result<String> {
    if conditions.is_empty() {
        return Err(Error::unsupported_operand(
            "at least one condition is required",
        ));
    }
    Ok(conditions.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryRegistry;

    #[test]
    fn test_select_query() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select(["test_column", "another_test_column"])
            .unwrap()
            .from_("test_table")
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `test_column`,`another_test_column` FROM `test_table`"
        );
    }

    #[test]
    fn test_select_query_no_columns() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select(())
            .unwrap()
            .from_("test_table")
            .unwrap()
            .build();
        assert_eq!(query, "SELECT * FROM `test_table`");
    }

    #[test]
    fn test_select_leading_wildcard() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select("*")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .build();
        assert_eq!(query, "SELECT * FROM `test_table`");
    }

    #[test]
    fn test_select_query_with_limit() {
        for (dialect, expected) in [
            ("mysql", "SELECT `test_column` FROM `test_table` LIMIT 10"),
            (
                "oracle",
                "SELECT \"test_column\" FROM \"test_table\" FETCH NEXT 10 ROWS ONLY",
            ),
        ] {
            let mut builder = QueryRegistry::get_builder(dialect).unwrap();
            let query = builder
                .select("test_column")
                .unwrap()
                .from_("test_table")
                .unwrap()
                .limit(10)
                .unwrap()
                .build();
            assert_eq!(query, expected);
        }
    }

    #[test]
    fn test_select_query_with_limit_and_offset() {
        let mut builder = QueryRegistry::get_builder("postgres").unwrap();
        let query = builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .limit(10)
            .unwrap()
            .offset(5)
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT \"test_column\" FROM \"test_table\" LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_oracle_offset_then_fetch_next() {
        let mut builder = QueryRegistry::get_builder("oracle").unwrap();
        let query = builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .offset(5)
            .unwrap()
            .limit(10)
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT \"test_column\" FROM \"test_table\" OFFSET 5 FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_select_query_with_order_by() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select(["test_column", "another_test_column"])
            .unwrap()
            .from_("test_table")
            .unwrap()
            .order_by("test_column")
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `test_column`,`another_test_column` FROM `test_table` ORDER BY `test_column`"
        );
    }

    #[test]
    fn test_where_clause_merges_conditions() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select(["test_column", "another_test_column"])
            .unwrap()
            .from_("test_table")
            .unwrap()
            .where_(["test_column = 1", "another_test_column > 2"])
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `test_column`,`another_test_column` FROM `test_table` WHERE test_column = 1 AND another_test_column > 2"
        );
    }

    #[test]
    fn test_group_by_having() {
        let mut builder = QueryRegistry::get_builder("sqlite").unwrap();
        let query = builder
            .select(["product_line", "AVG(unit_price)", "SUM(total)"])
            .unwrap()
            .from_("sales")
            .unwrap()
            .group_by("product_line")
            .unwrap()
            .having("SUM(total) > 1000")
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT \"product_line\",AVG(unit_price),SUM(total) FROM \"sales\" GROUP BY \"product_line\" HAVING SUM(total) > 1000"
        );
    }

    #[test]
    fn test_joins_with_conditions() {
        for kind in [
            JoinKind::Inner,
            JoinKind::Outer,
            JoinKind::Left,
            JoinKind::Right,
        ] {
            let mut builder = QueryRegistry::get_builder("oracle").unwrap();
            builder
                .select(["employee_id", "store_location"])
                .unwrap()
                .from_("employees")
                .unwrap()
                .join("payroll", kind, Some("employees.payroll_id = payroll.id"))
                .unwrap();
            assert_eq!(
                builder.build(),
                format!(
                    "SELECT \"employee_id\",\"store_location\" FROM \"employees\" {kind} JOIN \"payroll\" ON employees.payroll_id = payroll.id"
                )
            );
        }
    }

    #[test]
    fn test_joins_no_condition() {
        for kind in [JoinKind::Natural, JoinKind::Cross] {
            let mut builder = QueryRegistry::get_builder("oracle").unwrap();
            builder
                .select(["employee_id", "store_location"])
                .unwrap()
                .from_("employees")
                .unwrap()
                .join("payroll", kind, None)
                .unwrap();
            assert_eq!(
                builder.build(),
                format!(
                    "SELECT \"employee_id\",\"store_location\" FROM \"employees\" {kind} JOIN \"payroll\""
                )
            );
        }
    }

    #[test]
    fn test_invalid_join() {
        let mut builder = QueryRegistry::get_builder("oracle").unwrap();
        let result = builder
            .select(["employee_id"])
            .unwrap()
            .from_("employees")
            .unwrap()
            .join(
                "payroll",
                JoinKind::Natural,
                Some("employees.payroll_id = payroll.id"),
            );
        assert!(matches!(result, Err(Error::InvalidJoinCondition { .. })));
    }

    #[test]
    fn test_join_requires_condition() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let result = builder
            .select(["employee_id"])
            .unwrap()
            .from_("employees")
            .unwrap()
            .join("payroll", JoinKind::Inner, None);
        assert!(matches!(result, Err(Error::InvalidJoinCondition { .. })));
    }

    #[test]
    fn test_failed_append_leaves_chain_untouched() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .order_by("test_column")
            .unwrap();
        let before = builder.to_sql();
        assert!(builder.where_("test_column = 1").is_err());
        assert_eq!(builder.to_sql(), before);
    }

    #[test]
    fn test_clause_on_empty_builder() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let err = builder.from_("test_table").unwrap_err();
        assert_eq!(
            err.to_string(),
            "mysql dialect: FROM cannot follow an empty statement"
        );
    }

    #[test]
    fn test_disable_escape_identifier() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .disable_escape_identifiers()
            .select(["test_column", "another_test_column"])
            .unwrap()
            .from_("test_table")
            .unwrap()
            .where_(["test_column = 1", "another_test_column > 2"])
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT test_column,another_test_column FROM test_table WHERE test_column = 1 AND another_test_column > 2"
        );
    }

    #[test]
    fn test_escape_identifier_switch_preferences() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .disable_escape_identifiers()
            .select(["test_column", "another_test_column"])
            .unwrap()
            .enable_escape_identifiers()
            .from_("test_table")
            .unwrap()
            .where_(["test_column = 1", "another_test_column > 2"])
            .unwrap();
        assert_eq!(
            builder.build(),
            "SELECT test_column,another_test_column FROM `test_table` WHERE test_column = 1 AND another_test_column > 2"
        );
    }

    #[test]
    fn test_escape_toggle_round_trip() {
        let mut reference = QueryRegistry::get_builder("mysql").unwrap();
        reference
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap();

        let mut toggled = QueryRegistry::get_builder("mysql").unwrap();
        toggled.disable_escape_identifiers();
        toggled.enable_escape_identifiers();
        toggled
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap();
        assert_eq!(toggled.build(), reference.build());
    }

    #[test]
    fn test_union() {
        for (all, keyword) in [(false, "UNION"), (true, "UNION ALL")] {
            let mut nested = QueryRegistry::get_builder("mysql").unwrap();
            nested
                .select("another_test_column")
                .unwrap()
                .from_("another_test_table")
                .unwrap();

            let mut builder = QueryRegistry::get_builder("mysql").unwrap();
            builder
                .select("test_column")
                .unwrap()
                .from_("test_table")
                .unwrap();
            if all {
                builder.union_all(&nested).unwrap();
            } else {
                builder.union(&nested).unwrap();
            }
            assert_eq!(
                builder.build(),
                format!(
                    "SELECT `test_column` FROM `test_table` {keyword} SELECT `another_test_column` FROM `another_test_table`"
                )
            );
        }
    }

    #[test]
    fn test_except_and_intersect() {
        let mut nested = QueryRegistry::get_builder("mysql").unwrap();
        nested
            .select("another_test_column")
            .unwrap()
            .from_("another_test_table")
            .unwrap();
        let nested_sql = nested.to_sql();

        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .except_all(&nested)
            .unwrap();
        assert_eq!(
            builder.build(),
            format!("SELECT `test_column` FROM `test_table` EXCEPT ALL {nested_sql}")
        );

        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .intersect(&nested)
            .unwrap();
        assert_eq!(
            builder.build(),
            format!("SELECT `test_column` FROM `test_table` INTERSECT {nested_sql}")
        );
    }

    #[test]
    fn test_combinators_are_terminal() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap()
            .union("SELECT 1")
            .unwrap();
        assert!(builder.where_("x = 1").is_err());
    }

    #[test]
    fn test_insert() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .insert("test_table", ["test_column", "another_test_column"], (1, 2))
            .unwrap()
            .build();
        assert_eq!(
            query,
            "INSERT INTO `test_table` (`test_column`,`another_test_column`) VALUES (1,2)"
        );
    }

    #[test]
    fn test_insert_no_cols_query() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder.insert("test_table", (), (1, 2)).unwrap().build();
        assert_eq!(query, "INSERT INTO `test_table` VALUES (1,2)");
    }

    #[test]
    fn test_insert_multiple_values() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .insert(
                "test_table",
                ["test_column", "another_test_column"],
                [(1, 2), (3, 4)],
            )
            .unwrap()
            .build();
        assert_eq!(
            query,
            "INSERT INTO `test_table` (`test_column`,`another_test_column`) VALUES (1,2),(3,4)"
        );
    }

    #[test]
    fn test_insert_quotes_strings() {
        let mut builder = QueryRegistry::get_builder("postgres").unwrap();
        let query = builder
            .insert(
                "employees",
                ["id", "employee_name"],
                (1, "john doe"),
            )
            .unwrap()
            .build();
        assert_eq!(
            query,
            "INSERT INTO \"employees\" (\"id\",\"employee_name\") VALUES (1,'john doe')"
        );
    }

    #[test]
    fn test_insert_column_and_values_mismatch() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let result = builder.insert("test_table", ["test_column", "another_test_column"], (1,));
        assert!(matches!(
            result,
            Err(Error::ArityMismatch {
                expected: 2,
                found: 1
            })
        ));
        assert_eq!(builder.to_sql(), "");
    }

    #[test]
    fn test_insert_with_returning() {
        let mut builder = QueryRegistry::get_builder("postgres").unwrap();
        let query = builder
            .insert("employees", ["id", "employee_name"], (1, "john doe"))
            .unwrap()
            .returning(["id", "employee_name"])
            .unwrap()
            .build();
        assert_eq!(
            query,
            "INSERT INTO \"employees\" (\"id\",\"employee_name\") VALUES (1,'john doe') RETURNING \"id\",\"employee_name\""
        );
    }

    #[test]
    fn test_insert_returning_empty() {
        let mut builder = QueryRegistry::get_builder("postgres").unwrap();
        let query = builder
            .insert("employees", ["id", "employee_name"], (1, "john doe"))
            .unwrap()
            .returning(())
            .unwrap()
            .build();
        assert_eq!(
            query,
            "INSERT INTO \"employees\" (\"id\",\"employee_name\") VALUES (1,'john doe') RETURNING *"
        );
    }

    #[test]
    fn test_where_clause_with_subquery_text() {
        let mut sub = QueryRegistry::get_builder("mysql").unwrap();
        let subquery = sub
            .select("id")
            .unwrap()
            .from_("employees")
            .unwrap()
            .where_("salary > 10000")
            .unwrap()
            .build();

        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select(["employee_name", "salary"])
            .unwrap()
            .from_("employees")
            .unwrap()
            .where_([
                format!("id IN ({subquery})"),
                "department = 'Engineering'".to_string(),
            ])
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `employee_name`,`salary` FROM `employees` WHERE id IN (SELECT `id` FROM `employees` WHERE salary > 10000) AND department = 'Engineering'"
        );
    }

    #[test]
    fn test_subquery_in_from() {
        let mut sub = QueryRegistry::get_builder("mysql").unwrap();
        sub.select(["test_column", "another_test_column"])
            .unwrap()
            .from_("test_table")
            .unwrap()
            .where_("test_column = 1")
            .unwrap();

        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select("test_column")
            .unwrap()
            .from_(&sub)
            .unwrap()
            .where_("another_test_column > 2")
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `test_column` FROM (SELECT `test_column`,`another_test_column` FROM `test_table` WHERE test_column = 1) WHERE another_test_column > 2"
        );
    }

    #[test]
    fn test_build_clears_to_sql_preserves() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap();
        let first = builder.to_sql();
        assert_eq!(builder.to_sql(), first);
        assert_eq!(builder.build(), first);
        assert_eq!(builder.to_sql(), "");
    }

    #[test]
    fn test_display_matches_to_sql() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        builder
            .select("test_column")
            .unwrap()
            .from_("test_table")
            .unwrap();
        assert_eq!(builder.to_string(), builder.to_sql());
    }

    #[test]
    fn test_schema_qualified_table_escaped_whole() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        let query = builder
            .select("test_column")
            .unwrap()
            .from_("test_schema.test_table")
            .unwrap()
            .build();
        assert_eq!(
            query,
            "SELECT `test_column` FROM `test_schema.test_table`"
        );
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let mut builder = QueryRegistry::get_builder("mysql").unwrap();
        assert!(matches!(
            builder.select("not a valid; column"),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_select_with_alias_token() {
        let mut builder = QueryRegistry::get_builder("postgres").unwrap();
        let query = builder
            .select("first_name AS name")
            .unwrap()
            .from_("employee AS e")
            .unwrap()
            .build();
        assert_eq!(query, "SELECT \"first_name\" AS name FROM \"employee\" AS e");
    }

    #[test]
    fn test_invalid_transitions_exhaustively_rejected() {
        // Every kind pair absent from the dialect table must be refused.
        for dialect in ["mysql", "oracle", "postgres", "sqlite"] {
            let builder = QueryRegistry::get_builder(dialect).unwrap();
            for current in NodeKind::ALL {
                for candidate in NodeKind::ALL {
                    let allowed = builder_dialect_allows(&builder, current, candidate);
                    let mut probe = QueryRegistry::get_builder(dialect).unwrap();
                    probe.chain.push(placeholder(current));
                    let result = probe.append(placeholder(candidate));
                    assert_eq!(
                        result.is_ok(),
                        allowed,
                        "{dialect}: {current} -> {candidate}"
                    );
                }
            }
        }
    }

    fn builder_dialect_allows(builder: &Query, current: NodeKind, candidate: NodeKind) -> bool {
        builder.dialect.successors(current).contains(&candidate)
    }

    fn placeholder(kind: NodeKind) -> Node {
        match kind {
            NodeKind::Select => Node::Select { columns: "*".into() },
            NodeKind::From => Node::From { source: "t".into() },
            NodeKind::Join => Node::join(JoinKind::Cross, "t".into(), None).unwrap(),
            NodeKind::Where => Node::Where { conditions: "1 = 1".into() },
            NodeKind::GroupBy => Node::GroupBy { columns: "c".into() },
            NodeKind::Having => Node::Having { conditions: "1 = 1".into() },
            NodeKind::OrderBy => Node::OrderBy { columns: "c".into() },
            NodeKind::Limit => Node::Limit { count: 1 },
            NodeKind::Offset => Node::Offset { count: 1 },
            NodeKind::FetchNext => Node::FetchNext { count: 1 },
            NodeKind::Union => Node::Union { query: "SELECT 1".into(), all: false },
            NodeKind::Except => Node::Except { query: "SELECT 1".into(), all: false },
            NodeKind::Intersect => Node::Intersect { query: "SELECT 1".into(), all: false },
            NodeKind::Insert => Node::Insert {
                table: "t".into(),
                columns: String::new(),
                rows: vec!["(1)".into()],
            },
            NodeKind::Returning => Node::Returning { columns: "*".into() },
        }
    }
}
