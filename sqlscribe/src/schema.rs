//! A named schema grouping tables under one prefix

use sqlscribe_core::{validate_plain_identifier, Result};

use crate::table::Table;

/// A schema: every table built through it carries the schema prefix in its
/// qualified name
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    tables: Vec<Table>,
}

impl Schema {
    /// A schema holding tables with the given names (no column metadata)
    pub fn new<I, S>(dialect_key: &str, name: impl Into<String>, table_names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        validate_plain_identifier(name.as_str())?;
        let tables = table_names
            .into_iter()
            .map(|table_name| {
                Table::new(dialect_key, table_name, Vec::<String>::new())?
                    .with_schema(name.as_str())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { name, tables })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name() == name)
    }
}
