//! Rendering a clause chain to SQL text.
//!
//! Every dialect difference is resolved before a node enters the chain, so
//! rendering is a pure chain-to-text walk with no dialect parameter.

use crate::node::Node;

/// Render one clause to its SQL fragment
pub(crate) fn render_node(node: &Node) -> String {
    match node {
        Node::Select { columns } => format!("SELECT {columns}"),
        Node::From { source } => format!("FROM {source}"),
        Node::Join {
            kind,
            table,
            condition,
        } => match condition {
            Some(condition) => format!("{kind} JOIN {table} ON {condition}"),
            None => format!("{kind} JOIN {table}"),
        },
        Node::Where { conditions } => format!("WHERE {conditions}"),
        Node::GroupBy { columns } => format!("GROUP BY {columns}"),
        Node::Having { conditions } => format!("HAVING {conditions}"),
        Node::OrderBy { columns } => format!("ORDER BY {columns}"),
        Node::Limit { count } => format!("LIMIT {count}"),
        Node::Offset { count } => format!("OFFSET {count}"),
        Node::FetchNext { count } => format!("FETCH NEXT {count} ROWS ONLY"),
        Node::Union { query, all } => combinator("UNION", query, *all),
        Node::Except { query, all } => combinator("EXCEPT", query, *all),
        Node::Intersect { query, all } => combinator("INTERSECT", query, *all),
        Node::Insert {
            table,
            columns,
            rows,
        } => {
            let values = rows.join(",");
            if columns.is_empty() {
                format!("INSERT INTO {table} VALUES {values}")
            } else {
                format!("INSERT INTO {table} ({columns}) VALUES {values}")
            }
        }
        Node::Returning { columns } => format!("RETURNING {columns}"),
    }
}

fn combinator(keyword: &str, query: &str, all: bool) -> String {
    if all {
        format!("{keyword} ALL {query}")
    } else {
        format!("{keyword} {query}")
    }
}

/// Render a whole chain, clauses separated by single spaces
pub(crate) fn render_chain(chain: &[Node]) -> String {
    chain
        .iter()
        .map(render_node)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
