//! Sqlscribe Core - a fluent SQL statement builder
//!
//! This crate compiles a chain of clause calls (select, from, where, join,
//! group/order, pagination, combinators, insert) into dialect-correct SQL
//! text. Clause ordering is validated per dialect at append time, identifiers
//! are escaped per dialect, and nothing is executed: the output is a string.

pub mod column;
pub mod dialect;
pub mod error;
pub mod functions;
pub mod node;
pub mod query;
pub mod registry;
pub mod value;

mod ident;
mod render;

// Re-export main types
pub use column::{Column, Expression, ExpressionColumn, Operand};
pub use dialect::{Dialect, MySqlDialect, OracleDialect, PostgresDialect, SqliteDialect};
pub use error::{Error, Result};
pub use functions::FunctionArg;
pub use ident::{validate_alias, validate_plain_identifier, ESCAPE_IDENTIFIERS_ENV};
pub use node::{JoinKind, Node, NodeKind};
pub use query::{IntoColumns, IntoConditions, IntoQuerySql, IntoRow, IntoRows, IntoSource, Query};
pub use registry::QueryRegistry;
pub use value::Value;
