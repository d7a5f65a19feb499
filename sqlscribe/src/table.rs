//! Table metadata bound to a dialect.
//!
//! A [`Table`] knows its name, optional schema prefix, and column list, and
//! wraps a query builder for its dialect: `table.select(...)` projects its
//! columns into a `SELECT ... FROM <table>` chain. The table never executes
//! anything; it is a convenience for naming.

use sqlscribe_core::{
    validate_alias, validate_plain_identifier, Column, Error, Query, QueryRegistry, Result,
};

/// A named table with a known column list, bound to one dialect
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Option<String>,
    alias: Option<String>,
    columns: Vec<String>,
    dialect_key: &'static str,
}

impl Table {
    /// A table for the given dialect key. The name must be a plain
    /// identifier; the dialect key must be registered.
    pub fn new<I, S>(dialect_key: &str, name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dialect_key = QueryRegistry::dialect(dialect_key)?.name();
        let name = name.into();
        validate_plain_identifier(name.as_str())?;
        let columns = columns
            .into_iter()
            .map(|column| {
                let column = column.into();
                validate_plain_identifier(column.as_str())?;
                Ok(column)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            name,
            schema: None,
            alias: None,
            columns,
            dialect_key,
        })
    }

    pub fn mysql<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table::new("mysql", name, columns)
    }

    pub fn oracle<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table::new("oracle", name, columns)
    }

    pub fn postgres<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table::new("postgres", name, columns)
    }

    pub fn sqlite<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table::new("sqlite", name, columns)
    }

    /// Prefix the table with a schema; the qualified name becomes
    /// `schema.name`
    pub fn with_schema(mut self, schema: impl Into<String>) -> Result<Self> {
        let schema = schema.into();
        validate_plain_identifier(schema.as_str())?;
        self.schema = Some(schema);
        Ok(self)
    }

    /// Attach an alias, rendered as `FROM <table> AS <alias>`
    pub fn as_(mut self, alias: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        validate_alias(alias.as_str())?;
        self.alias = Some(alias);
        Ok(self)
    }

    /// The table name with its schema prefix, when one is set
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn dialect_key(&self) -> &'static str {
        self.dialect_key
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// A [`Column`] object for one of this table's columns, addressable in
    /// expressions as `table.column`
    pub fn column(&self, name: &str) -> Result<Column> {
        if !self.columns.iter().any(|column| column == name) {
            return Err(Error::invalid_identifier(format!(
                "{name} is not a column of {}",
                self.name
            )));
        }
        Column::new(name, self.name.as_str())
    }

    /// Column objects for every column, in declaration order
    pub fn columns(&self) -> Result<Vec<Column>> {
        self.columns
            .iter()
            .map(|name| Column::new(name.as_str(), self.name.as_str()))
            .collect()
    }

    /// Start a `SELECT ... FROM <this table>` builder. Column objects are
    /// projected by their unqualified names.
    pub fn select<I, S>(&self, columns: I) -> Result<Query>
    where
        I: IntoIterator<Item = S>,
        S: Into<ProjectedColumn>,
    {
        let tokens: Vec<String> = columns
            .into_iter()
            .map(|column| column.into().into_token())
            .collect();
        let mut query = QueryRegistry::get_builder(self.dialect_key)?;
        if tokens.is_empty() {
            query.select_all()?;
        } else {
            query.select(tokens)?;
        }
        query.from_(self.from_token().as_str())?;
        Ok(query)
    }

    /// `SELECT * FROM <this table>`
    pub fn select_all(&self) -> Result<Query> {
        self.select(Vec::<ProjectedColumn>::new())
    }

    fn from_token(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {alias}", self.qualified_name()),
            None => self.qualified_name(),
        }
    }
}

/// A select-list entry handed to [`Table::select`]: a raw token or a
/// [`Column`], projected by its unqualified name
pub enum ProjectedColumn {
    Token(String),
    Column(Column),
}

impl ProjectedColumn {
    fn into_token(self) -> String {
        match self {
            ProjectedColumn::Token(token) => token,
            ProjectedColumn::Column(column) => column.to_string(),
        }
    }
}

impl From<&str> for ProjectedColumn {
    fn from(token: &str) -> Self {
        ProjectedColumn::Token(token.to_string())
    }
}

impl From<String> for ProjectedColumn {
    fn from(token: String) -> Self {
        ProjectedColumn::Token(token)
    }
}

impl From<Column> for ProjectedColumn {
    fn from(column: Column) -> Self {
        ProjectedColumn::Column(column)
    }
}

impl From<&Column> for ProjectedColumn {
    fn from(column: &Column) -> Self {
        ProjectedColumn::Column(column.clone())
    }
}
