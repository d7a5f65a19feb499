//! Loading table metadata from `CREATE TABLE` DDL text.
//!
//! This is a shallow reader for bootstrapping [`Table`] objects from schema
//! dumps: it extracts table names, optional schema prefixes, and column
//! names, skipping constraint clauses. It is not a SQL parser and does not
//! read column types.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use sqlscribe_core::{Error, Result};

use crate::table::Table;

/// One `CREATE TABLE` statement reduced to its identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub schema: Option<String>,
    pub columns: Vec<String>,
}

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?is)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:([A-Za-z_][A-Za-z0-9_]*)\.)?[`"\[]?([A-Za-z_][A-Za-z0-9_]*)[`"\]]?\s*\((.*?)\)\s*;"#,
        )
        .expect("invalid built-in create-table regex")
    })
}

fn constraint_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(CONSTRAINT|PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|CHECK|KEY|INDEX)\b")
            .expect("invalid built-in constraint-prefix regex")
    })
}

/// Extract table definitions from DDL text. Statements that are not
/// `CREATE TABLE` are ignored.
pub fn parse_create_tables(sql_text: &str) -> Vec<TableDef> {
    create_table_re()
        .captures_iter(sql_text)
        .map(|captures| {
            let schema = captures.get(1).map(|m| m.as_str().to_string());
            let name = captures[2].to_string();
            let columns = split_column_defs(&captures[3])
                .into_iter()
                .filter(|def| !def.is_empty() && !constraint_prefix_re().is_match(def))
                .filter_map(column_name)
                .collect();
            TableDef {
                name,
                schema,
                columns,
            }
        })
        .collect()
}

/// Split a column-definition body on top-level commas, leaving commas inside
/// parentheses (type lengths, composite keys) intact.
fn split_column_defs(body: &str) -> Vec<String> {
    let mut defs = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in body.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                defs.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    defs.push(current.trim().to_string());
    defs
}

fn column_name(def: String) -> Option<String> {
    def.split_whitespace()
        .next()
        .map(|token| {
            token
                .trim_matches(|c| matches!(c, '`' | '[' | ']' | '"'))
                .to_string()
        })
        .filter(|name| !name.is_empty())
}

/// Build [`Table`] objects for every `CREATE TABLE` in the text, keyed by
/// (unqualified) table name
pub fn tables_from_ddl(sql_text: &str, dialect_key: &str) -> Result<BTreeMap<String, Table>> {
    let mut tables = BTreeMap::new();
    for def in parse_create_tables(sql_text) {
        let mut table = Table::new(dialect_key, def.name.as_str(), def.columns)?;
        if let Some(schema) = def.schema {
            table = table.with_schema(schema)?;
        }
        tables.insert(def.name, table);
    }
    Ok(tables)
}

/// Load tables from a `.sql` file, or from every `.sql` file in a directory.
///
/// Fails with [`Error::InvalidPath`] when the path does not exist or names a
/// file without the `.sql` extension.
pub fn load_tables_from_ddls(
    path: impl AsRef<Path>,
    dialect_key: &str,
) -> Result<BTreeMap<String, Table>> {
    let path = path.as_ref();
    if path.is_dir() {
        let mut tables = BTreeMap::new();
        let entries =
            fs::read_dir(path).map_err(|_| Error::invalid_path(path.display().to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|_| Error::invalid_path(path.display().to_string()))?;
            let entry_path = entry.path();
            if entry_path.extension().and_then(|ext| ext.to_str()) == Some("sql") {
                tables.append(&mut load_sql_file(&entry_path, dialect_key)?);
            }
        }
        Ok(tables)
    } else if path.is_file() {
        if path.extension().and_then(|ext| ext.to_str()) != Some("sql") {
            return Err(Error::invalid_path(path.display().to_string()));
        }
        load_sql_file(path, dialect_key)
    } else {
        Err(Error::invalid_path(path.display().to_string()))
    }
}

fn load_sql_file(path: &Path, dialect_key: &str) -> Result<BTreeMap<String, Table>> {
    debug!(path = %path.display(), "loading DDL file");
    let sql_text =
        fs::read_to_string(path).map_err(|_| Error::invalid_path(path.display().to_string()))?;
    tables_from_ddl(&sql_text, dialect_key)
}
