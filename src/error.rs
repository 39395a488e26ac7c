use std::{fmt, io, path::PathBuf};

/// The kind of object a [`GraphError::NotFound`] refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Missing {
    Graph(String),
    Node(String),
    Edge(String, String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Graph(name) => write!(f, "graph {name:?}"),
            Missing::Node(label) => write!(f, "node {label:?}"),
            Missing::Edge(source, target) => write!(f, "edge ({source:?}, {target:?})"),
        }
    }
}

/// Errors returned by graph operations and stores.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A referenced graph, node or edge does not exist.
    #[error("not found: {0}")]
    NotFound(Missing),
    /// The query has no defined value on this graph.
    #[error("not computable: {0}")]
    NotComputable(&'static str),
    /// A graph with this name is already stored.
    #[error("graph {0:?} already exists")]
    AlreadyExists(String),
    /// The name cannot be used as a store key.
    #[error("invalid graph name: {0:?}")]
    InvalidName(String),
    #[error("I/O error: {source} (path: {path})")]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("malformed graph record: {source} (path: {path})")]
    Json {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
}

impl GraphError {
    pub fn graph_not_found(name: impl Into<String>) -> Self {
        GraphError::NotFound(Missing::Graph(name.into()))
    }

    pub fn node_not_found(label: impl Into<String>) -> Self {
        GraphError::NotFound(Missing::Node(label.into()))
    }

    pub fn edge_not_found(source: impl Into<String>, target: impl Into<String>) -> Self {
        GraphError::NotFound(Missing::Edge(source.into(), target.into()))
    }

    /// Returns true for conditions that should be reported to the user
    /// rather than treated as a failure of the store itself.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GraphError::Io { .. } | GraphError::Json { .. })
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
