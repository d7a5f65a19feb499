//! Aggregate and scalar SQL function helpers.
//!
//! Each helper wraps a column (or a raw value) in a function call and
//! returns a new [`Column`] whose name is the call text. Function-call
//! tokens pass identifier validation as aggregate/scalar shapes and render
//! verbatim, never escaped. Trailing underscores keep names clear of common
//! prelude items (`max_`, `abs_`).

use crate::column::Column;

/// An argument to a SQL function: a column or a raw literal
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    Column(Column),
    Text(String),
    Number(String),
}

impl FunctionArg {
    /// Unquoted rendering: column names and literals appear verbatim
    fn plain(&self) -> &str {
        match self {
            FunctionArg::Column(column) => column.name(),
            FunctionArg::Text(text) => text,
            FunctionArg::Number(number) => number,
        }
    }

    /// Quoted rendering: non-column literals are single-quoted
    fn quoted(&self) -> String {
        match self {
            FunctionArg::Column(column) => column.name().to_string(),
            FunctionArg::Text(text) => format!("'{text}'"),
            FunctionArg::Number(number) => format!("'{number}'"),
        }
    }

    fn table(&self) -> &str {
        match self {
            FunctionArg::Column(column) => column.table(),
            _ => "",
        }
    }
}

impl From<Column> for FunctionArg {
    fn from(column: Column) -> Self {
        FunctionArg::Column(column)
    }
}

impl From<&Column> for FunctionArg {
    fn from(column: &Column) -> Self {
        FunctionArg::Column(column.clone())
    }
}

impl From<&str> for FunctionArg {
    fn from(text: &str) -> Self {
        FunctionArg::Text(text.to_string())
    }
}

impl From<String> for FunctionArg {
    fn from(text: String) -> Self {
        FunctionArg::Text(text)
    }
}

impl From<i32> for FunctionArg {
    fn from(number: i32) -> Self {
        FunctionArg::Number(number.to_string())
    }
}

impl From<i64> for FunctionArg {
    fn from(number: i64) -> Self {
        FunctionArg::Number(number.to_string())
    }
}

impl From<f64> for FunctionArg {
    fn from(number: f64) -> Self {
        FunctionArg::Number(number.to_string())
    }
}

fn call(function: &str, arg: impl Into<FunctionArg>) -> Column {
    let arg = arg.into();
    Column::raw(
        format!("{function}({})", arg.plain()),
        arg.table().to_string(),
    )
}

fn call_with(function: &str, arg: impl Into<FunctionArg>, extra: impl Into<FunctionArg>) -> Column {
    let arg = arg.into();
    let extra = extra.into();
    Column::raw(
        format!("{function}({}, {})", arg.plain(), extra.plain()),
        arg.table().to_string(),
    )
}

pub fn max_(column: impl Into<FunctionArg>) -> Column {
    call("MAX", column)
}

pub fn min_(column: impl Into<FunctionArg>) -> Column {
    call("MIN", column)
}

pub fn avg(column: impl Into<FunctionArg>) -> Column {
    call("AVG", column)
}

pub fn sum_(column: impl Into<FunctionArg>) -> Column {
    call("SUM", column)
}

pub fn count(column: impl Into<FunctionArg>) -> Column {
    call("COUNT", column)
}

pub fn distinct(column: impl Into<FunctionArg>) -> Column {
    call("DISTINCT", column)
}

pub fn abs_(column: impl Into<FunctionArg>) -> Column {
    call("ABS", column)
}

pub fn ceil(column: impl Into<FunctionArg>) -> Column {
    call("CEIL", column)
}

pub fn floor(column: impl Into<FunctionArg>) -> Column {
    call("FLOOR", column)
}

pub fn sqrt(column: impl Into<FunctionArg>) -> Column {
    call("SQRT", column)
}

pub fn sign(column: impl Into<FunctionArg>) -> Column {
    call("SIGN", column)
}

pub fn exp(column: impl Into<FunctionArg>) -> Column {
    call("EXP", column)
}

pub fn ln(column: impl Into<FunctionArg>) -> Column {
    call("LN", column)
}

pub fn upper(column: impl Into<FunctionArg>) -> Column {
    call("UPPER", column)
}

pub fn lower(column: impl Into<FunctionArg>) -> Column {
    call("LOWER", column)
}

pub fn length(column: impl Into<FunctionArg>) -> Column {
    call("LENGTH", column)
}

pub fn reverse(column: impl Into<FunctionArg>) -> Column {
    call("REVERSE", column)
}

pub fn trim(column: impl Into<FunctionArg>) -> Column {
    call("TRIM", column)
}

pub fn ltrim(column: impl Into<FunctionArg>) -> Column {
    call("LTRIM", column)
}

pub fn rtrim(column: impl Into<FunctionArg>) -> Column {
    call("RTRIM", column)
}

pub fn round_(column: impl Into<FunctionArg>) -> Column {
    call("ROUND", column)
}

/// `ROUND(<column>, <decimals>)`
pub fn round_with(column: impl Into<FunctionArg>, decimals: u8) -> Column {
    call_with("ROUND", column, i32::from(decimals))
}

pub fn trunc(column: impl Into<FunctionArg>) -> Column {
    call("TRUNC", column)
}

/// `TRUNC(<column>, <decimals>)`
pub fn trunc_with(column: impl Into<FunctionArg>, decimals: u8) -> Column {
    call_with("TRUNC", column, i32::from(decimals))
}

/// `POWER(<base>, <exponent>)`; both arguments render verbatim
pub fn power(base: impl Into<FunctionArg>, exponent: impl Into<FunctionArg>) -> Column {
    call_with("POWER", base, exponent)
}

/// `CONCAT(...)`: non-column arguments are single-quoted
pub fn concat<I>(args: I) -> Column
where
    I: IntoIterator<Item = FunctionArg>,
{
    let args: Vec<FunctionArg> = args.into_iter().collect();
    let table = args
        .iter()
        .map(FunctionArg::table)
        .find(|table| !table.is_empty())
        .unwrap_or("")
        .to_string();
    let rendered = args
        .iter()
        .map(FunctionArg::quoted)
        .collect::<Vec<_>>()
        .join(", ");
    Column::raw(format!("CONCAT({rendered})"), table)
}
