use std::collections::{HashMap, HashSet};

use crate::{
    directedness::Directedness,
    edge_ends::EdgeEnds,
    error::{GraphError, Result},
    record::GraphRecord,
};

/// An in-memory graph with string node labels.
///
/// Nodes and edges are kept in insertion order so that every iteration, and
/// therefore every exported record, is deterministic.  Edges have set
/// semantics: adding an edge that already exists does nothing, and for
/// undirected graphs `(a, b)` and `(b, a)` are the same edge.  Self-loops are
/// allowed.
///
/// A `Graph` is built fresh from a [`GraphRecord`] by [`Graph::materialize`]
/// for each operation and turned back into a record with
/// [`Graph::to_record`]; it is never cached between operations.
#[derive(Clone, Debug)]
pub struct Graph {
    directedness: Directedness,
    nodes: Vec<String>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeEnds<String>>,
    edge_set: HashSet<EdgeEnds<String>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(directedness: Directedness) -> Self {
        Self {
            directedness,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Builds a graph from a stored record.  Duplicate nodes and edges
    /// collapse, and edge endpoints missing from the node list are added
    /// after the listed nodes.
    pub fn materialize(record: &GraphRecord) -> Self {
        let mut graph = Self::new(record.directed.into());
        for label in &record.nodes {
            graph.add_node(label.as_str());
        }
        for (source, target) in &record.edges {
            graph.add_edge(source.as_str(), target.as_str());
        }
        graph
    }

    /// Snapshots the graph as a record with the given name.
    pub fn to_record(&self, name: impl Into<String>) -> GraphRecord {
        let (nodes, edges) = self.export();
        GraphRecord {
            name: name.into(),
            directed: self.is_directed(),
            nodes,
            edges,
        }
    }

    /// Returns the node labels and edge pairs in insertion order.
    pub fn export(&self) -> (Vec<String>, Vec<(String, String)>) {
        let edges = self
            .edges
            .iter()
            .map(|e| (e.source().clone(), e.target().clone()))
            .collect();
        (self.nodes.clone(), edges)
    }

    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    pub fn is_directed(&self) -> bool {
        self.directedness.is_directed()
    }

    // Nodes

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.node_index.contains_key(label)
    }

    /// Returns the position of a node in insertion order.
    pub fn node_position(&self, label: &str) -> Option<usize> {
        self.node_index.get(label).copied()
    }

    /// Adds a node if it is not already present.  Returns true if the node
    /// was added.
    pub fn add_node(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.node_index.contains_key(&label) {
            return false;
        }
        self.node_index.insert(label.clone(), self.nodes.len());
        self.nodes.push(label);
        true
    }

    /// Removes a node and every edge incident to it.
    pub fn remove_node(&mut self, label: &str) -> Result<()> {
        let Some(position) = self.node_index.remove(label) else {
            return Err(GraphError::node_not_found(label));
        };
        self.nodes.remove(position);
        self.reindex_nodes();
        self.retain_edges(|e| !e.touches(label));
        Ok(())
    }

    /// Renames a node, remapping its edges.  If `new` already names a node,
    /// the two nodes are merged: the result has the union of their edges and
    /// keeps the position of `new`.  An edge between the merged nodes becomes
    /// a self-loop.
    pub fn relabel_node(&mut self, old: &str, new: &str) -> Result<()> {
        let Some(&position) = self.node_index.get(old) else {
            return Err(GraphError::node_not_found(old));
        };
        if old == new {
            return Ok(());
        }
        if self.contains_node(new) {
            self.nodes.remove(position);
        } else {
            self.nodes[position] = new.to_string();
        }
        self.reindex_nodes();

        let edges = std::mem::take(&mut self.edges);
        self.edge_set.clear();
        for edge in edges {
            let edge = edge.map(|label| if label == old { new.to_string() } else { label });
            self.insert_edge(edge);
        }
        Ok(())
    }

    /// Builds the subgraph induced by the given labels, in the order given.
    pub fn subgraph<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Result<Graph> {
        let mut result = Graph::new(self.directedness);
        for label in labels {
            if !self.contains_node(label) {
                return Err(GraphError::node_not_found(label));
            }
            result.add_node(label);
        }
        for edge in &self.edges {
            let (source, target) = edge.values();
            if result.contains_node(source) && result.contains_node(target) {
                result.insert_edge(edge.clone());
            }
        }
        Ok(result)
    }

    fn reindex_nodes(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
    }

    // Edges

    /// Returns the edges in insertion order.  Undirected edges have their
    /// endpoints sorted.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges
            .iter()
            .map(|e| (e.source().as_str(), e.target().as_str()))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edge_set.contains(&self.edge_key(source, target))
    }

    /// Adds an edge, adding either endpoint if it is missing.  Returns true if
    /// the edge was added.
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) -> bool {
        let (source, target) = (source.into(), target.into());
        self.add_node(source.clone());
        self.add_node(target.clone());
        let edge = EdgeEnds::new(source, target, self.directedness);
        self.insert_edge(edge)
    }

    /// Removes an edge.  For undirected graphs either orientation names the
    /// same edge.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> Result<()> {
        let key = self.edge_key(source, target);
        if !self.edge_set.remove(&key) {
            return Err(GraphError::edge_not_found(source, target));
        }
        self.edges.retain(|e| e != &key);
        Ok(())
    }

    fn edge_key(&self, source: &str, target: &str) -> EdgeEnds<String> {
        EdgeEnds::new(source.to_string(), target.to_string(), self.directedness)
    }

    fn insert_edge(&mut self, edge: EdgeEnds<String>) -> bool {
        if self.edge_set.insert(edge.clone()) {
            self.edges.push(edge);
            true
        } else {
            false
        }
    }

    fn retain_edges(&mut self, mut keep: impl FnMut(&EdgeEnds<String>) -> bool) {
        let edge_set = &mut self.edge_set;
        self.edges.retain(|e| {
            let keep = keep(e);
            if !keep {
                edge_set.remove(e);
            }
            keep
        });
    }

    // Neighborhoods

    /// Gets the nodes reachable by one edge from `label`: successors for
    /// directed graphs, all adjacent nodes otherwise.  Each neighbor appears
    /// once, in edge insertion order.
    pub fn neighbors<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let directed = self.is_directed();
        self.unique_ends(move |e| {
            if directed {
                (e.source() == label).then(|| e.target())
            } else {
                e.other_end(label)
            }
        })
    }

    /// Gets the nodes with an edge into `label`.  Same as
    /// [`Self::neighbors`] for undirected graphs.
    pub fn predecessors<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let directed = self.is_directed();
        self.unique_ends(move |e| {
            if directed {
                (e.target() == label).then(|| e.source())
            } else {
                e.other_end(label)
            }
        })
    }

    fn unique_ends<'a>(
        &'a self,
        mut end: impl FnMut(&'a EdgeEnds<String>) -> Option<&'a String> + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let mut seen = HashSet::new();
        self.edges.iter().filter_map(move |e| {
            let label = end(e)?.as_str();
            seen.insert(label).then_some(label)
        })
    }

    /// Builds successor lists by node position, in edge insertion order.
    /// Edges are unique, so each neighbor appears once.
    pub fn index_adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            let (source, target) = edge.values();
            let (s, t) = (self.node_index[source], self.node_index[target]);
            adjacency[s].push(t);
            if !self.is_directed() && s != t {
                adjacency[t].push(s);
            }
        }
        adjacency
    }

    /// Gets the number of edge ends at `label`.  A self-loop counts twice.
    /// For directed graphs this is the in-degree plus the out-degree.
    pub fn degree(&self, label: &str) -> Result<usize> {
        if !self.contains_node(label) {
            return Err(GraphError::node_not_found(label));
        }
        Ok(self
            .edges
            .iter()
            .map(|e| (e.source() == label) as usize + (e.target() == label) as usize)
            .sum())
    }

    /// Gets the number of edges leaving `label`.  Equal to the degree for
    /// undirected graphs.
    pub fn out_degree(&self, label: &str) -> Result<usize> {
        if !self.is_directed() {
            return self.degree(label);
        }
        if !self.contains_node(label) {
            return Err(GraphError::node_not_found(label));
        }
        Ok(self.edges.iter().filter(|e| e.source() == label).count())
    }

    /// Gets the number of edges entering `label`.  Equal to the degree for
    /// undirected graphs.
    pub fn in_degree(&self, label: &str) -> Result<usize> {
        if !self.is_directed() {
            return self.degree(label);
        }
        if !self.contains_node(label) {
            return Err(GraphError::node_not_found(label));
        }
        Ok(self.edges.iter().filter(|e| e.target() == label).count())
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.directedness == other.directedness
            && self.nodes == other.nodes
            && self.edges == other.edges
    }
}

impl Eq for Graph {}
