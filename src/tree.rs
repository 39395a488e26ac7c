//! Spanning and degree-bounded trees.

use std::collections::{HashMap, HashSet};

use crate::{
    Graph, GraphRecord,
    directedness::Directedness,
    error::{GraphError, Result},
    queries::{AdjacencyList, adjacency_list},
};

/// Suffix of the derived record holding a graph's spanning tree.
pub const TREE_SUFFIX: &str = "-tree";
/// Suffix of the derived record holding a graph's binary tree.
pub const BINARY_SUFFIX: &str = "-binary";

/// A rooted tree extracted from a graph.  Nodes are kept in discovery
/// order and each node's children in the order they were added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    root: String,
    order: Vec<String>,
    children: HashMap<String, Vec<String>>,
}

impl Tree {
    fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            order: vec![root.to_string()],
            children: HashMap::from([(root.to_string(), Vec::new())]),
        }
    }

    fn attach(&mut self, parent: &str, child: &str) {
        self.order.push(child.to_string());
        self.children.insert(child.to_string(), Vec::new());
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Gets the children of a node, or `None` if the node is not in the
    /// tree.  Leaves have an empty list.
    pub fn children(&self, label: &str) -> Option<&[String]> {
        self.children.get(label).map(Vec::as_slice)
    }

    /// Gets the nodes of the tree in discovery order, starting at the root.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.children.contains_key(label)
    }

    /// Gets the `(parent, child)` edges, grouped by parent in discovery
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order.iter().flat_map(move |parent| {
            self.children[parent]
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    /// Converts the tree into a graph with the given directedness.
    pub fn to_graph(&self, directedness: Directedness) -> Graph {
        let mut graph = Graph::new(directedness);
        for label in self.nodes() {
            graph.add_node(label);
        }
        for (parent, child) in self.edges() {
            graph.add_edge(parent, child);
        }
        graph
    }

    pub fn to_record(&self, name: impl Into<String>, directedness: Directedness) -> GraphRecord {
        self.to_graph(directedness).to_record(name)
    }
}

/// Builds a tree rooted at `root` by frequency-ordered expansion.
///
/// Starting at the root, each node claims up to `max_children` of its not
/// yet visited neighbors, taken in [`adjacency_list`] order, as children;
/// then each new child is expanded in turn.  The visited set is shared by
/// the whole expansion, so every node is claimed by exactly one parent.
///
/// Only nodes reachable from `root` appear in the result.  Nodes in other
/// components are left out without an error.
pub fn build_tree(graph: &Graph, root: &str, max_children: Option<usize>) -> Result<Tree> {
    if !graph.contains_node(root) {
        return Err(GraphError::node_not_found(root));
    }
    let adjacency = adjacency_list(graph);
    Ok(expand(&adjacency, root, max_children.unwrap_or(usize::MAX)))
}

/// Builds a tree in which every node has at most two children.
pub fn build_binary_tree(graph: &Graph, root: &str) -> Result<Tree> {
    build_tree(graph, root, Some(2))
}

/// Runs the expansion depth-first with an explicit stack of nodes waiting
/// to claim children.  A node's children are pushed in reverse so the first
/// child's whole subtree is expanded before its next sibling.
fn expand(adjacency: &AdjacencyList, root: &str, max_children: usize) -> Tree {
    let mut tree = Tree::new(root);
    let mut visited: HashSet<&str> = HashSet::from([root]);
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let mut added = Vec::new();
        for neighbor in adjacency.get(node).unwrap_or_default() {
            if added.len() >= max_children {
                break;
            }
            if visited.insert(neighbor.as_str()) {
                tree.attach(node, neighbor);
                added.push(neighbor.as_str());
            }
        }
        stack.extend(added.into_iter().rev());
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_test_support::{ArbRecord, directed, square, star, undirected};

    use quickcheck_macros::quickcheck;

    #[test]
    fn test_spanning_tree_of_square() {
        let tree = build_tree(&square(), "A", None).unwrap();
        assert_eq!(tree.nodes().collect::<Vec<_>>(), vec!["A", "B", "D", "C"]);
        assert_eq!(
            tree.edges().collect::<Vec<_>>(),
            vec![("A", "B"), ("A", "D"), ("B", "C")]
        );
    }

    #[test]
    fn test_tree_prefers_low_frequency_neighbors() {
        // H is a hub; L is a leaf hanging off R.
        let graph = undirected(&[
            ("R", "H"),
            ("R", "L"),
            ("H", "X"),
            ("H", "Y"),
            ("H", "Z"),
        ]);
        let tree = build_tree(&graph, "R", None).unwrap();
        assert_eq!(tree.children("R").unwrap(), ["L", "H"]);
        assert_eq!(tree.children("H").unwrap(), ["X", "Y", "Z"]);
    }

    #[test]
    fn test_binary_tree_limits_children() {
        let graph = undirected(&[
            ("O", "A"),
            ("O", "B"),
            ("O", "C"),
            ("O", "D"),
            ("A", "E"),
        ]);
        let tree = build_binary_tree(&graph, "O").unwrap();
        assert_eq!(tree.children("O").unwrap(), ["B", "C"]);
        assert!(tree.nodes().all(|n| tree.children(n).unwrap().len() <= 2));
        // D and A are only reachable as further children of O.
        assert!(!tree.contains("D"));
        assert!(!tree.contains("A"));
        assert!(!tree.contains("E"));
    }

    #[test]
    fn test_tree_covers_only_root_component() {
        let mut graph = star();
        graph.add_edge("P", "Q");
        let tree = build_tree(&graph, "O", None).unwrap();
        assert_eq!(tree.node_count(), 4);
        assert!(!tree.contains("P"));
    }

    #[test]
    fn test_tree_follows_direction() {
        let graph = directed(&[("A", "B"), ("C", "A")]);
        let tree = build_tree(&graph, "A", None).unwrap();
        assert_eq!(tree.nodes().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_tree_over_long_path() {
        const LEN: usize = 100_000;
        let mut graph = Graph::new(Directedness::Undirected);
        for i in 1..LEN {
            graph.add_edge(format!("n{}", i - 1), format!("n{i}"));
        }
        let tree = build_tree(&graph, "n0", None).unwrap();
        assert_eq!(tree.node_count(), LEN);
        assert_eq!(tree.children("n0").unwrap(), ["n1"]);
        assert!(tree.children(&format!("n{}", LEN - 1)).unwrap().is_empty());

        let binary = build_binary_tree(&graph, "n0").unwrap();
        assert_eq!(binary.edges().count(), LEN - 1);
    }

    #[test]
    fn test_subtree_expands_before_sibling() {
        // B's subtree claims C before A gets to it.
        let graph = undirected(&[("R", "A"), ("R", "B"), ("B", "C"), ("A", "C"), ("A", "X")]);
        let tree = build_tree(&graph, "R", None).unwrap();
        let first = tree.children("R").unwrap()[0].clone();
        let second = tree.children("R").unwrap()[1].clone();
        assert!(tree.contains("C"));
        let claimed_by_first = tree.children(&first).unwrap().iter().any(|c| c == "C");
        let claimed_by_second = tree.children(&second).unwrap().iter().any(|c| c == "C");
        assert!(claimed_by_first && !claimed_by_second);
    }

    #[test]
    fn test_tree_missing_root() {
        assert!(matches!(
            build_tree(&square(), "Z", None),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn test_tree_record() {
        let tree = build_tree(&star(), "O", None).unwrap();
        let record = tree.to_record("star-tree", Directedness::Undirected);
        assert_eq!(record.name, "star-tree");
        assert_eq!(record.nodes, vec!["O", "A", "B", "C"]);
        assert_eq!(record.edges.len(), 3);
    }

    #[quickcheck]
    fn prop_unbounded_tree_spans_reachable_nodes(ArbRecord(record): ArbRecord) -> bool {
        let graph = Graph::materialize(&record);
        let Some(root) = graph.nodes().next() else {
            return true;
        };
        let tree = build_tree(&graph, root, None).unwrap();
        let mut reachable: Vec<_> = graph.bfs(root).map(|(label, _)| label).collect();
        let mut covered: Vec<_> = tree.nodes().collect();
        reachable.sort();
        covered.sort();
        reachable == covered && tree.edges().count() + 1 == tree.node_count()
    }

    #[quickcheck]
    fn prop_binary_tree_has_at_most_two_children(ArbRecord(record): ArbRecord) -> bool {
        let graph = Graph::materialize(&record);
        graph.nodes().all(|root| {
            let tree = build_binary_tree(&graph, root).unwrap();
            tree.nodes()
                .all(|n| tree.children(n).is_some_and(|c| c.len() <= 2))
        })
    }
}
