//! Dialect registry: string keys to dialect objects and fresh builders.
//!
//! The table is a static constructed at compile time; there is no runtime
//! registration and no global mutable state. Every `get_builder` call hands
//! out an independent builder, so chain mutation in one consumer never
//! leaks into another.

use crate::dialect::{Dialect, MySqlDialect, OracleDialect, PostgresDialect, SqliteDialect};
use crate::query::Query;
use crate::{Error, Result};

static DIALECTS: [(&str, &dyn Dialect); 4] = [
    ("mysql", &MySqlDialect),
    ("oracle", &OracleDialect),
    ("postgres", &PostgresDialect),
    ("sqlite", &SqliteDialect),
];

/// Lookup of the built-in dialects by key
pub struct QueryRegistry;

impl QueryRegistry {
    /// Resolve a dialect key (`"mysql"`, `"oracle"`, `"postgres"`,
    /// `"sqlite"`) to its dialect object
    pub fn dialect(key: &str) -> Result<&'static dyn Dialect> {
        DIALECTS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, dialect)| *dialect)
            .ok_or_else(|| Error::UnknownDialect(key.to_string()))
    }

    /// A fresh, independent builder for the given dialect key
    pub fn get_builder(key: &str) -> Result<Query> {
        Ok(Query::new(Self::dialect(key)?))
    }

    /// The registered dialect keys
    pub fn keys() -> impl Iterator<Item = &'static str> {
        DIALECTS.iter().map(|(name, _)| *name)
    }
}
