//! Sqlscribe - a fluent, dialect-aware SQL statement builder
//!
//! Sqlscribe composes SQL text through chained clause calls and renders it
//! for a chosen dialect (mysql, oracle, postgres, sqlite). Dialects differ
//! in identifier quoting and pagination syntax; clause ordering is validated
//! at every step, so an illegal chain fails at the call site rather than
//! producing broken SQL.
//!
//! ```
//! use sqlscribe::QueryRegistry;
//!
//! let mut query = QueryRegistry::get_builder("mysql").unwrap();
//! let sql = query
//!     .select(["employee_name", "salary"]).unwrap()
//!     .from_("employees").unwrap()
//!     .where_("salary > 10000").unwrap()
//!     .build();
//! assert_eq!(
//!     sql,
//!     "SELECT `employee_name`,`salary` FROM `employees` WHERE salary > 10000"
//! );
//! ```
//!
//! On top of the core builder this crate adds table and schema metadata
//! wrappers and a DDL loader that bootstraps them from `CREATE TABLE` text.

pub mod ddl;
pub mod schema;
pub mod table;

// Re-export the core builder surface
pub use sqlscribe_core::{
    functions, Column, Dialect, Error, Expression, ExpressionColumn, FunctionArg, IntoColumns,
    IntoConditions, IntoQuerySql, IntoRow, IntoRows, IntoSource, JoinKind, Node, NodeKind,
    Operand, Query, QueryRegistry, Result, Value, ESCAPE_IDENTIFIERS_ENV,
};

pub use ddl::{load_tables_from_ddls, parse_create_tables, tables_from_ddl, TableDef};
pub use schema::Schema;
pub use table::{ProjectedColumn, Table};

/// A fresh builder for the given dialect key
pub fn builder(dialect_key: &str) -> Result<Query> {
    QueryRegistry::get_builder(dialect_key)
}
