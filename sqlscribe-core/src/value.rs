//! Literal value types for insert rows, comparison operands, and membership lists

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A literal SQL value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// String value
    String(String),
    /// JSON value
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is an integer or floating-point number
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Value::I32(_) | Value::I64(_) | Value::F32(_) | Value::F64(_)
        )
    }

    /// Get the SQL type name for this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::I32(_) => "INTEGER",
            Value::I64(_) => "BIGINT",
            Value::F32(_) => "REAL",
            Value::F64(_) => "DOUBLE PRECISION",
            Value::String(_) => "TEXT",
            Value::Json(_) => "JSON",
        }
    }

    /// Render this value as inline SQL literal text.
    ///
    /// Strings are single-quoted (embedded quotes doubled), numbers and
    /// booleans render verbatim, JSON renders as a quoted JSON string.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Value::I32(n) => n.to_string(),
            Value::I64(n) => n.to_string(),
            Value::F32(n) => n.to_string(),
            Value::F64(n) => n.to_string(),
            Value::String(s) => quote_string(s),
            Value::Json(j) => quote_string(&j.to_string()),
        }
    }

    /// Render this value as a comparison/membership operand.
    ///
    /// Only strings and numbers are legal here; anything else is an
    /// `UnsupportedOperand` error at construction time.
    pub(crate) fn to_operand_text(&self) -> Result<String> {
        match self {
            Value::String(s) => Ok(quote_string(s)),
            Value::I32(_) | Value::I64(_) | Value::F32(_) | Value::F64(_) => {
                Ok(self.to_literal())
            }
            other => Err(Error::unsupported_operand(format!(
                "columns can only be combined with other columns, strings, or numbers, got {}",
                other.type_name()
            ))),
        }
    }
}

fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// Implement From for common types
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F32(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(Value::from(()), Value::Null);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(42i32)), Value::I32(42));
        assert_eq!(Value::from(None::<i32>), Value::Null);
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Value::I32(42).to_literal(), "42");
        assert_eq!(Value::F64(2.5).to_literal(), "2.5");
        assert_eq!(Value::from("john doe").to_literal(), "'john doe'");
        assert_eq!(Value::Null.to_literal(), "NULL");
        assert_eq!(Value::Bool(true).to_literal(), "TRUE");
    }

    #[test]
    fn test_literal_quote_doubling() {
        assert_eq!(Value::from("O'Brien").to_literal(), "'O''Brien'");
    }

    #[test]
    fn test_operand_text_rejects_non_scalar() {
        assert!(Value::Null.to_operand_text().is_err());
        assert!(Value::Bool(false).to_operand_text().is_err());
        assert_eq!(Value::from("x").to_operand_text().unwrap(), "'x'");
        assert_eq!(Value::I64(7).to_operand_text().unwrap(), "7");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::I32(42).type_name(), "INTEGER");
        assert_eq!(Value::String("test".to_string()).type_name(), "TEXT");
        assert_eq!(Value::Bool(true).type_name(), "BOOLEAN");
        assert_eq!(Value::Null.type_name(), "NULL");
    }
}
