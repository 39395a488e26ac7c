//! The persisted shape of a graph.
//!
//! A [`GraphRecord`] is a flat, name-keyed snapshot of a graph: its
//! directedness, its node labels and its edges as `(source, target)` pairs.
//! Records are the unit of storage; every operation reads a whole record,
//! materializes a [`Graph`](crate::Graph) from it and, if it changed
//! anything, writes a whole record back.
//!
//! Records validate nothing beyond their shape.  Graph-theoretic consistency
//! (unique labels, edge endpoints present in the node list) is restored by
//! [`Graph::materialize`](crate::Graph::materialize).

use serde::{Deserialize, Serialize};

/// A graph as stored: `{"name", "directed", "nodes", "edges"}`.
///
/// Edges serialize as two-element arrays and deserialize from any
/// two-element array, so tuple and list encodings read back the same.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    pub name: String,
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

impl GraphRecord {
    /// Creates an empty record.
    pub fn new(name: impl Into<String>, directed: bool) -> Self {
        Self {
            name: name.into(),
            directed,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Creates a record seeded with the given nodes and edges.
    pub fn with_contents<N, E>(name: impl Into<String>, directed: bool, nodes: N, edges: E) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        E: IntoIterator<Item = (N::Item, N::Item)>,
    {
        Self {
            name: name.into(),
            directed,
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: edges
                .into_iter()
                .map(|(source, target)| (source.into(), target.into()))
                .collect(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
