//! Column references, comparison expressions, and arithmetic combinations.
//!
//! A `Column` is a validated identifier bound to an owning table. Comparing
//! two columns (or a column and a literal) yields an [`Expression`] fragment;
//! combining them arithmetically yields an [`ExpressionColumn`], which is
//! itself column-like and chains further. Fragments render as raw text and
//! are never re-escaped.

use std::fmt;

use crate::ident;
use crate::value::Value;
use crate::{Error, Result};

/// Something a column can be compared with or combined against: another
/// column, a derived expression column, or a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(Column),
    Combined(ExpressionColumn),
    Value(Value),
}

impl Operand {
    fn text(&self) -> Result<String> {
        match self {
            Operand::Column(column) => Ok(column.fully_qualified_name()),
            Operand::Combined(combined) => Ok(combined.fully_qualified_name()),
            Operand::Value(value) => value.to_operand_text(),
        }
    }
}

impl From<Column> for Operand {
    fn from(column: Column) -> Self {
        Operand::Column(column)
    }
}

impl From<&Column> for Operand {
    fn from(column: &Column) -> Self {
        Operand::Column(column.clone())
    }
}

impl From<ExpressionColumn> for Operand {
    fn from(combined: ExpressionColumn) -> Self {
        Operand::Combined(combined)
    }
}

impl From<&ExpressionColumn> for Operand {
    fn from(combined: &ExpressionColumn) -> Self {
        Operand::Combined(combined.clone())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Value(Value::String(value))
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Value(Value::I32(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Value(Value::I64(value))
    }
}

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Operand::Value(Value::F32(value))
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Value(Value::F64(value))
    }
}

/// A comparison fragment: `left OP right`, with an optional trailing alias
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub left: String,
    pub operator: &'static str,
    pub right: String,
    alias: Option<String>,
}

impl Expression {
    fn new(left: String, operator: &'static str, right: String) -> Self {
        Expression {
            left,
            operator,
            right,
            alias: None,
        }
    }

    /// Attach a validated alias, rendered as a trailing ` AS <alias>`
    pub fn as_(mut self, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        ident::validate_alias(&alias)?;
        self.alias = Some(alias);
        Ok(self)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// A column reference bound to its owning table.
///
/// The name must be a plain identifier, an aggregate call, a scalar call,
/// or a parenthesized expression; anything else fails at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    table: String,
    alias: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Result<Self> {
        let name = name.into();
        ident::validate_column_name(&name)?;
        Ok(Column {
            name,
            table: table.into(),
            alias: None,
        })
    }

    /// Construct without validation, for names built by this crate
    pub(crate) fn raw(name: String, table: String) -> Self {
        Column {
            name,
            table,
            alias: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// `table.name`, or just the name when no owning table is bound
    pub fn fully_qualified_name(&self) -> String {
        if self.table.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.table, self.name)
        }
    }

    /// Attach a validated alias, rendered as a trailing ` AS <alias>`
    pub fn as_(mut self, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        ident::validate_alias(&alias)?;
        self.alias = Some(alias);
        Ok(self)
    }

    pub fn eq(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), "=", other.into())
    }

    pub fn ne(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), "<>", other.into())
    }

    pub fn lt(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), "<", other.into())
    }

    pub fn le(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), "<=", other.into())
    }

    pub fn gt(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), ">", other.into())
    }

    pub fn ge(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.fully_qualified_name(), ">=", other.into())
    }

    pub fn add(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.fully_qualified_name(), "+", other.into())
    }

    pub fn sub(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.fully_qualified_name(), "-", other.into())
    }

    pub fn mul(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.fully_qualified_name(), "*", other.into())
    }

    pub fn div(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.fully_qualified_name(), "/", other.into())
    }

    pub fn in_list<I, V>(&self, values: I) -> Result<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        membership(self.fully_qualified_name(), "IN", values)
    }

    pub fn not_in_list<I, V>(&self, values: I) -> Result<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        membership(self.fully_qualified_name(), "NOT IN", values)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

/// A column derived from arithmetic over other columns.
///
/// Its fully-qualified name is its own rendered text; no single owning table
/// applies. It chains like a plain column, so `(a + b) * c` is expressed as
/// `a.add(&b)?.mul(&c)?`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionColumn {
    text: String,
    alias: Option<String>,
}

impl ExpressionColumn {
    pub(crate) fn raw(text: String) -> Self {
        ExpressionColumn { text, alias: None }
    }

    pub fn fully_qualified_name(&self) -> String {
        self.text.clone()
    }

    /// Attach a validated alias, rendered as a trailing ` AS <alias>`
    pub fn as_(mut self, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        ident::validate_alias(&alias)?;
        self.alias = Some(alias);
        Ok(self)
    }

    pub fn eq(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), "=", other.into())
    }

    pub fn ne(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), "<>", other.into())
    }

    pub fn lt(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), "<", other.into())
    }

    pub fn le(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), "<=", other.into())
    }

    pub fn gt(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), ">", other.into())
    }

    pub fn ge(&self, other: impl Into<Operand>) -> Result<Expression> {
        comparison(self.text.clone(), ">=", other.into())
    }

    pub fn add(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.text.clone(), "+", other.into())
    }

    pub fn sub(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.text.clone(), "-", other.into())
    }

    pub fn mul(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.text.clone(), "*", other.into())
    }

    pub fn div(&self, other: impl Into<Operand>) -> Result<ExpressionColumn> {
        arithmetic(self.text.clone(), "/", other.into())
    }

    pub fn in_list<I, V>(&self, values: I) -> Result<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        membership(self.text.clone(), "IN", values)
    }

    pub fn not_in_list<I, V>(&self, values: I) -> Result<Expression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        membership(self.text.clone(), "NOT IN", values)
    }
}

impl fmt::Display for ExpressionColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

fn comparison(left: String, operator: &'static str, right: Operand) -> Result<Expression> {
    Ok(Expression::new(left, operator, right.text()?))
}

fn arithmetic(left: String, operator: &'static str, right: Operand) -> Result<ExpressionColumn> {
    Ok(ExpressionColumn::raw(format!(
        "{left} {operator} {}",
        right.text()?
    )))
}

fn membership<I, V>(left: String, operator: &'static str, values: I) -> Result<Expression>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    let first = values
        .first()
        .ok_or_else(|| Error::unsupported_operand("membership list must not be empty"))?;
    let first_kind = std::mem::discriminant(first);
    if values
        .iter()
        .any(|value| std::mem::discriminant(value) != first_kind)
    {
        return Err(Error::unsupported_operand(
            "membership list must hold values of a single type",
        ));
    }
    let rendered = values
        .iter()
        .map(Value::to_operand_text)
        .collect::<Result<Vec<_>>>()?
        .join(", ");
    Ok(Expression::new(left, operator, format!("({rendered})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_column_initialization() {
        let col = Column::new("valid_column", "test_table").unwrap();
        assert_eq!(col.name(), "valid_column");
        assert_eq!(col.table(), "test_table");
        assert_eq!(col.fully_qualified_name(), "test_table.valid_column");
    }

    #[test]
    fn test_invalid_column_name() {
        assert!(matches!(
            Column::new("invalid column!", "test_table"),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_column_equality() {
        let col1 = Column::new("column1", "table1").unwrap();
        let col2 = Column::new("column2", "table2").unwrap();
        let expr = col1.eq(&col2).unwrap();
        assert_eq!(expr.to_string(), "table1.column1 = table2.column2");
    }

    #[test]
    fn test_column_comparisons() {
        let col = Column::new("column1", "table1").unwrap();
        assert_eq!(
            col.eq("value").unwrap().to_string(),
            "table1.column1 = 'value'"
        );
        assert_eq!(
            col.lt("value").unwrap().to_string(),
            "table1.column1 < 'value'"
        );
        assert_eq!(col.gt(100).unwrap().to_string(), "table1.column1 > 100");
        assert_eq!(col.le(50).unwrap().to_string(), "table1.column1 <= 50");
        assert_eq!(
            col.ge(&col).unwrap().to_string(),
            "table1.column1 >= table1.column1"
        );
        assert_eq!(
            col.ne("test").unwrap().to_string(),
            "table1.column1 <> 'test'"
        );
    }

    #[test]
    fn test_column_arithmetic() {
        let col1 = Column::new("column1", "table1").unwrap();
        let col2 = Column::new("column2", "table2").unwrap();

        let added = col1.add(&col2).unwrap();
        assert_eq!(added.to_string(), "table1.column1 + table2.column2");

        let subtracted = col1.sub(10).unwrap();
        assert_eq!(subtracted.to_string(), "table1.column1 - 10");

        let multiplied = col1.mul(&col2).unwrap();
        assert_eq!(multiplied.to_string(), "table1.column1 * table2.column2");
    }

    #[test]
    fn test_combined_column_fqn_is_its_text() {
        let col1 = Column::new("column1", "table1").unwrap();
        let col2 = Column::new("column2", "table2").unwrap();
        let combined = col1.add(&col2).unwrap();
        assert_eq!(
            combined.fully_qualified_name(),
            "table1.column1 + table2.column2"
        );
    }

    #[test]
    fn test_combined_column_chains() {
        let a = Column::new("a", "t").unwrap();
        let b = Column::new("b", "t").unwrap();
        let c = Column::new("c", "t").unwrap();
        let chained = a.add(&b).unwrap().mul(&c).unwrap();
        assert_eq!(chained.to_string(), "t.a + t.b * t.c");
    }

    #[test]
    fn test_unsupported_operand() {
        let col = Column::new("column1", "table1").unwrap();
        assert!(matches!(
            col.eq(Value::Bool(true)),
            Err(Error::UnsupportedOperand { .. })
        ));
        assert!(matches!(
            col.add(Value::Null),
            Err(Error::UnsupportedOperand { .. })
        ));
    }

    #[test]
    fn test_membership() {
        let col = Column::new("dept", "employee").unwrap();
        let expr = col.in_list(["sales", "engineering"]).unwrap();
        assert_eq!(
            expr.to_string(),
            "employee.dept IN ('sales', 'engineering')"
        );
        let expr = col.not_in_list([1, 2, 3]).unwrap();
        assert_eq!(expr.to_string(), "employee.dept NOT IN (1, 2, 3)");
    }

    #[test]
    fn test_membership_rejects_mixed_types() {
        let col = Column::new("dept", "employee").unwrap();
        let result = col.in_list([Value::I32(1), Value::String("two".into())]);
        assert!(matches!(result, Err(Error::UnsupportedOperand { .. })));
    }

    #[test]
    fn test_membership_rejects_empty_list() {
        let col = Column::new("dept", "employee").unwrap();
        let result = col.in_list(Vec::<Value>::new());
        assert!(matches!(result, Err(Error::UnsupportedOperand { .. })));
    }

    #[test]
    fn test_alias_rendering() {
        let col = Column::new("first_name", "employee")
            .unwrap()
            .as_("name")
            .unwrap();
        assert_eq!(col.to_string(), "first_name AS name");
    }

    #[test]
    fn test_invalid_alias() {
        let col = Column::new("first_name", "employee").unwrap();
        assert!(matches!(
            col.as_("$something$not$allowed"),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_expression_alias() {
        let a = Column::new("a", "t").unwrap();
        let expr = a.gt(5).unwrap().as_("big").unwrap();
        assert_eq!(expr.to_string(), "t.a > 5 AS big");
    }
}
