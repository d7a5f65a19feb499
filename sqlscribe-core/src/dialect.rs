//! SQL dialects: clause-ordering rules, identifier escaping, and pagination
//! shape.
//!
//! A dialect is an immutable, process-wide object. The transition table maps
//! each clause kind to its legal successor kinds; per-dialect overrides
//! replace entries wholesale rather than merging with the base table.

use crate::node::{Node, NodeKind};
use crate::{Error, Result};

/// A SQL vendor profile
pub trait Dialect: std::fmt::Debug + Send + Sync {
    /// Registry key and error-message name for this dialect
    fn name(&self) -> &'static str;

    /// Legal successor kinds for a clause of the given kind
    fn successors(&self, kind: NodeKind) -> &'static [NodeKind];

    /// Wrap an identifier in this dialect's quoting characters
    fn escape_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier)
    }

    /// The pagination node this dialect appends for a `limit(n)` call
    fn limit_node(&self, count: u64) -> Node {
        Node::Limit { count }
    }

    /// Check that `candidate` may follow `current` in this dialect.
    fn validate_transition(&self, current: NodeKind, candidate: NodeKind) -> Result<()> {
        if self.successors(current).contains(&candidate) {
            Ok(())
        } else {
            Err(Error::invalid_transition(
                self.name(),
                current.to_string(),
                candidate.to_string(),
            ))
        }
    }
}

/// The transition table shared by mysql, postgres, and sqlite.
///
/// Combinators are terminal; Limit may only be followed by Offset, which
/// ends the chain.
pub(crate) fn base_successors(kind: NodeKind) -> &'static [NodeKind] {
    match kind {
        NodeKind::Select => &[NodeKind::From],
        NodeKind::From => &[
            NodeKind::Join,
            NodeKind::Where,
            NodeKind::GroupBy,
            NodeKind::OrderBy,
            NodeKind::Limit,
            NodeKind::Union,
            NodeKind::Except,
            NodeKind::Intersect,
            NodeKind::Offset,
        ],
        NodeKind::Join => &[
            NodeKind::Join,
            NodeKind::Where,
            NodeKind::GroupBy,
            NodeKind::OrderBy,
            NodeKind::Limit,
        ],
        NodeKind::Where => &[
            NodeKind::Where,
            NodeKind::GroupBy,
            NodeKind::OrderBy,
            NodeKind::Limit,
        ],
        NodeKind::GroupBy => &[NodeKind::Having, NodeKind::OrderBy, NodeKind::Limit],
        NodeKind::Having => &[NodeKind::OrderBy, NodeKind::Limit],
        NodeKind::OrderBy => &[NodeKind::Limit],
        NodeKind::Limit => &[NodeKind::Offset],
        NodeKind::Insert => &[NodeKind::Returning],
        NodeKind::Offset
        | NodeKind::FetchNext
        | NodeKind::Union
        | NodeKind::Except
        | NodeKind::Intersect
        | NodeKind::Returning => &[],
    }
}

/// MySQL: backtick escaping, `LIMIT n [OFFSET m]` pagination
#[derive(Debug)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn successors(&self, kind: NodeKind) -> &'static [NodeKind] {
        base_successors(kind)
    }

    fn escape_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier)
    }
}

/// PostgreSQL: double-quote escaping, `LIMIT n [OFFSET m]` pagination
#[derive(Debug)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn successors(&self, kind: NodeKind) -> &'static [NodeKind] {
        base_successors(kind)
    }
}

/// SQLite: double-quote escaping, `LIMIT n [OFFSET m]` pagination
#[derive(Debug)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn successors(&self, kind: NodeKind) -> &'static [NodeKind] {
        base_successors(kind)
    }
}

/// Oracle: double-quote escaping, `[OFFSET m] FETCH NEXT n ROWS ONLY`
/// pagination.
///
/// Its table replaces the base pagination entries wholesale: FetchNext
/// stands in wherever the base table accepts Limit, Offset's only legal
/// successor is FetchNext, and FetchNext is terminal.
#[derive(Debug)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn successors(&self, kind: NodeKind) -> &'static [NodeKind] {
        match kind {
            NodeKind::From => &[
                NodeKind::Join,
                NodeKind::Where,
                NodeKind::GroupBy,
                NodeKind::OrderBy,
                NodeKind::FetchNext,
                NodeKind::Union,
                NodeKind::Except,
                NodeKind::Intersect,
                NodeKind::Offset,
            ],
            NodeKind::Join => &[
                NodeKind::Join,
                NodeKind::Where,
                NodeKind::GroupBy,
                NodeKind::OrderBy,
                NodeKind::FetchNext,
            ],
            NodeKind::Where => &[
                NodeKind::Where,
                NodeKind::GroupBy,
                NodeKind::OrderBy,
                NodeKind::FetchNext,
            ],
            NodeKind::GroupBy => &[NodeKind::Having, NodeKind::OrderBy, NodeKind::FetchNext],
            NodeKind::Having => &[NodeKind::OrderBy, NodeKind::FetchNext],
            NodeKind::OrderBy => &[NodeKind::FetchNext],
            NodeKind::Offset => &[NodeKind::FetchNext],
            NodeKind::Limit | NodeKind::FetchNext => &[],
            other => base_successors(other),
        }
    }

    fn limit_node(&self, count: u64) -> Node {
        Node::FetchNext { count }
    }
}
