//! Clause nodes and the clause chain.
//!
//! A query is a linear sequence of clause nodes. Per-node payload is
//! immutable once appended; the chain itself is an append-only `Vec<Node>`
//! owned by the [`Query`](crate::Query) facade, so it can never branch or
//! cycle and has exactly one root.

use std::fmt;

use crate::{Error, Result};

/// The kind tag of a clause node, used for transition validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    FetchNext,
    Union,
    Except,
    Intersect,
    Insert,
    Returning,
}

impl NodeKind {
    /// All clause kinds, for exhaustive transition-table tests
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Select,
        NodeKind::From,
        NodeKind::Join,
        NodeKind::Where,
        NodeKind::GroupBy,
        NodeKind::Having,
        NodeKind::OrderBy,
        NodeKind::Limit,
        NodeKind::Offset,
        NodeKind::FetchNext,
        NodeKind::Union,
        NodeKind::Except,
        NodeKind::Intersect,
        NodeKind::Insert,
        NodeKind::Returning,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Select => "SELECT",
            NodeKind::From => "FROM",
            NodeKind::Join => "JOIN",
            NodeKind::Where => "WHERE",
            NodeKind::GroupBy => "GROUP BY",
            NodeKind::Having => "HAVING",
            NodeKind::OrderBy => "ORDER BY",
            NodeKind::Limit => "LIMIT",
            NodeKind::Offset => "OFFSET",
            NodeKind::FetchNext => "FETCH NEXT",
            NodeKind::Union => "UNION",
            NodeKind::Except => "EXCEPT",
            NodeKind::Intersect => "INTERSECT",
            NodeKind::Insert => "INSERT",
            NodeKind::Returning => "RETURNING",
        };
        write!(f, "{}", name)
    }
}

/// SQL join kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Outer,
    Left,
    Right,
    Cross,
    Natural,
}

impl JoinKind {
    /// Whether this join kind carries no ON condition
    pub fn is_conditionless(&self) -> bool {
        matches!(self, JoinKind::Cross | JoinKind::Natural)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinKind::Inner => "INNER",
            JoinKind::Outer => "OUTER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Cross => "CROSS",
            JoinKind::Natural => "NATURAL",
        };
        write!(f, "{}", name)
    }
}

/// One clause of a statement, with its kind-specific payload.
///
/// All text payloads are already validated and escaped by the facade; nodes
/// are inert data holders for the renderer and the transition validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Select {
        columns: String,
    },
    From {
        source: String,
    },
    Join {
        kind: JoinKind,
        table: String,
        condition: Option<String>,
    },
    Where {
        conditions: String,
    },
    GroupBy {
        columns: String,
    },
    Having {
        conditions: String,
    },
    OrderBy {
        columns: String,
    },
    Limit {
        count: u64,
    },
    Offset {
        count: u64,
    },
    FetchNext {
        count: u64,
    },
    Union {
        query: String,
        all: bool,
    },
    Except {
        query: String,
        all: bool,
    },
    Intersect {
        query: String,
        all: bool,
    },
    Insert {
        table: String,
        columns: String,
        rows: Vec<String>,
    },
    Returning {
        columns: String,
    },
}

impl Node {
    /// Build a join node, enforcing the condition rules for its kind.
    ///
    /// Natural and cross joins must carry no condition; every other kind
    /// requires one.
    pub fn join(kind: JoinKind, table: String, condition: Option<String>) -> Result<Self> {
        match (&condition, kind.is_conditionless()) {
            (Some(_), true) => Err(Error::invalid_join_condition(format!(
                "a {} join must not carry an ON condition",
                kind
            ))),
            (None, false) => Err(Error::invalid_join_condition(format!(
                "a {} join requires an ON condition",
                kind
            ))),
            _ => Ok(Node::Join {
                kind,
                table,
                condition,
            }),
        }
    }

    /// The kind tag of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Select { .. } => NodeKind::Select,
            Node::From { .. } => NodeKind::From,
            Node::Join { .. } => NodeKind::Join,
            Node::Where { .. } => NodeKind::Where,
            Node::GroupBy { .. } => NodeKind::GroupBy,
            Node::Having { .. } => NodeKind::Having,
            Node::OrderBy { .. } => NodeKind::OrderBy,
            Node::Limit { .. } => NodeKind::Limit,
            Node::Offset { .. } => NodeKind::Offset,
            Node::FetchNext { .. } => NodeKind::FetchNext,
            Node::Union { .. } => NodeKind::Union,
            Node::Except { .. } => NodeKind::Except,
            Node::Intersect { .. } => NodeKind::Intersect,
            Node::Insert { .. } => NodeKind::Insert,
            Node::Returning { .. } => NodeKind::Returning,
        }
    }
}
