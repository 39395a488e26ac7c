//! Structural queries over a [`Graph`].
//!
//! Distances are unweighted shortest-path lengths following edge direction.
//! Queries built on eccentricity ([`diameter`], [`radius`], [`center`]) are
//! only defined when every node can reach every other node; otherwise they
//! fail with [`GraphError::NotComputable`].

use std::collections::{HashMap, HashSet};

use crate::{
    Graph,
    error::{GraphError, Result},
};

/// Neighbor lists keyed by node, in node order.  See [`adjacency_list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyList {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl AdjacencyList {
    /// Gets the ordered neighbors of a node.
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.index
            .get(label)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(label, neighbors)| (label.as_str(), neighbors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counts how often each label occurs across the endpoints of all edges.  A
/// self-loop counts its node twice.
pub fn endpoint_frequencies(graph: &Graph) -> HashMap<&str, usize> {
    let mut frequencies = HashMap::new();
    for (source, target) in graph.edges() {
        *frequencies.entry(source).or_insert(0) += 1;
        *frequencies.entry(target).or_insert(0) += 1;
    }
    frequencies
}

/// Builds the frequency-ordered adjacency list of a graph.
///
/// Neighbors are first collected by walking the edges sorted by
/// `(source, target)`, keeping the first appearance of each neighbor
/// (successors only for directed graphs).  Each list is then stably sorted
/// by how often the neighbor occurs across all edge endpoints, so
/// low-degree neighbors come first.  Every node has an entry; isolated
/// nodes map to an empty list.
pub fn adjacency_list(graph: &Graph) -> AdjacencyList {
    let frequencies = endpoint_frequencies(graph);
    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort();

    // Edges are unique, so only the reverse of an undirected self-loop
    // could repeat a neighbor.
    let mut lists: Vec<Vec<&str>> = vec![Vec::new(); graph.node_count()];
    let mut push = |from: &str, to| {
        if let Some(i) = graph.node_position(from) {
            lists[i].push(to);
        }
    };
    for (source, target) in edges {
        push(source, target);
        if !graph.is_directed() && source != target {
            push(target, source);
        }
    }

    let entries: Vec<(String, Vec<String>)> = graph
        .nodes()
        .zip(lists)
        .map(|(label, mut neighbors)| {
            neighbors.sort_by_key(|n| frequencies.get(n).copied().unwrap_or(0));
            (
                label.to_string(),
                neighbors.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();
    let index = entries
        .iter()
        .enumerate()
        .map(|(i, (label, _))| (label.clone(), i))
        .collect();
    AdjacencyList { entries, index }
}

/// Gets the degree of a node.  See [`Graph::degree`].
pub fn degree(graph: &Graph, label: &str) -> Result<usize> {
    graph.degree(label)
}

/// Sums the degrees of all nodes; each edge is counted at both ends.
pub fn total_degree(graph: &Graph) -> usize {
    graph
        .nodes()
        .map(|label| graph.degree(label).unwrap_or(0))
        .sum()
}

/// Partitions the nodes into connected components.  Direction is ignored,
/// so for directed graphs these are the weakly connected components.
pub fn connected_components<'g>(graph: &'g Graph) -> Vec<HashSet<&'g str>> {
    let nodes: Vec<&str> = graph.nodes().collect();
    let neighbors = |label: &&'g str| -> Vec<&'g str> {
        graph
            .neighbors(*label)
            .chain(graph.predecessors(*label))
            .collect()
    };

    #[cfg(feature = "pathfinding")]
    {
        pathfinding::prelude::connected_components(&nodes, neighbors)
    }

    #[cfg(not(feature = "pathfinding"))]
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut components = Vec::new();
        for start in nodes {
            if seen.contains(start) {
                continue;
            }
            let mut component = HashSet::from([start]);
            let mut stack = vec![start];
            while let Some(label) = stack.pop() {
                for next in neighbors(&label) {
                    if component.insert(next) {
                        stack.push(next);
                    }
                }
            }
            seen.extend(component.iter().copied());
            components.push(component);
        }
        components
    }
}

/// Checks whether the graph has exactly one connected component, ignoring
/// direction.  An empty graph is not connected.
pub fn is_connected(graph: &Graph) -> bool {
    !graph.is_empty() && connected_components(graph).len() == 1
}

/// Checks whether every node can reach every other node following edge
/// direction.  Same as [`is_connected`] for undirected graphs.
pub fn is_strongly_connected<'g>(graph: &'g Graph) -> bool {
    if !graph.is_directed() || graph.is_empty() {
        return is_connected(graph);
    }

    #[cfg(feature = "pathfinding")]
    {
        let nodes: Vec<&str> = graph.nodes().collect();
        let components =
            pathfinding::prelude::strongly_connected_components(&nodes, |label: &&'g str| {
                graph.neighbors(*label).collect::<Vec<_>>()
            });
        components.len() == 1
    }

    #[cfg(not(feature = "pathfinding"))]
    {
        let Some(first) = graph.nodes().next() else {
            return false;
        };
        let reaches_all = graph.bfs(first).count() == graph.node_count();
        let mut reached = HashSet::from([first]);
        let mut stack = vec![first];
        while let Some(label) = stack.pop() {
            for prev in graph.predecessors(label) {
                if reached.insert(prev) {
                    stack.push(prev);
                }
            }
        }
        reaches_all && reached.len() == graph.node_count()
    }
}

/// Checks whether the graph has an Eulerian circuit.
///
/// Undirected graphs need every degree even; directed graphs need every
/// in-degree equal to the out-degree.  In both cases the graph must be
/// connected (strongly, when directed), including isolated nodes.  A graph
/// with no nodes is not Eulerian.
pub fn is_eulerian(graph: &Graph) -> bool {
    if graph.is_empty() {
        return false;
    }
    let balanced = graph.nodes().all(|label| {
        if graph.is_directed() {
            graph.in_degree(label).ok() == graph.out_degree(label).ok()
        } else {
            graph.degree(label).is_ok_and(|d| d % 2 == 0)
        }
    });
    balanced && is_strongly_connected(graph)
}

/// Gets the greatest distance from `label` to any other node.
pub fn eccentricity(graph: &Graph, label: &str) -> Result<usize> {
    if !graph.contains_node(label) {
        return Err(GraphError::node_not_found(label));
    }
    let mut reached = 0;
    let mut farthest = 0;
    for (_, distance) in graph.bfs(label) {
        reached += 1;
        farthest = farthest.max(distance);
    }
    if reached < graph.node_count() {
        return Err(not_connected(graph));
    }
    Ok(farthest)
}

/// Computes the eccentricity of every node, in node order.
pub fn eccentricities(graph: &Graph) -> Result<Vec<(&str, usize)>> {
    if graph.is_empty() {
        return Err(GraphError::NotComputable("graph has no nodes"));
    }
    graph
        .nodes()
        .map(|label| eccentricity(graph, label).map(|e| (label, e)))
        .collect()
}

/// Gets the maximum eccentricity.
pub fn diameter(graph: &Graph) -> Result<usize> {
    let eccentricities = eccentricities(graph)?;
    Ok(eccentricities.iter().map(|&(_, e)| e).max().unwrap_or(0))
}

/// Gets the minimum eccentricity.
pub fn radius(graph: &Graph) -> Result<usize> {
    let eccentricities = eccentricities(graph)?;
    Ok(eccentricities.iter().map(|&(_, e)| e).min().unwrap_or(0))
}

/// Gets the nodes whose eccentricity equals the radius, in node order.
pub fn center(graph: &Graph) -> Result<Vec<String>> {
    let eccentricities = eccentricities(graph)?;
    let radius = eccentricities.iter().map(|&(_, e)| e).min().unwrap_or(0);
    Ok(eccentricities
        .into_iter()
        .filter(|&(_, e)| e == radius)
        .map(|(label, _)| label.to_string())
        .collect())
}

fn not_connected(graph: &Graph) -> GraphError {
    if graph.is_directed() {
        GraphError::NotComputable("graph is not strongly connected")
    } else {
        GraphError::NotComputable("graph is not connected")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_test_support::{ArbRecord, directed, square, star, undirected};

    use quickcheck_macros::quickcheck;

    #[test]
    fn test_adjacency_list_orders_by_frequency() {
        // Frequencies: A=3, B=1, C=2, D=2.
        let graph = undirected(&[("A", "C"), ("A", "B"), ("A", "D"), ("C", "D")]);
        let adjacency = adjacency_list(&graph);
        assert_eq!(adjacency.get("A").unwrap(), ["B", "C", "D"]);
        assert_eq!(adjacency.get("C").unwrap(), ["D", "A"]);
        assert_eq!(adjacency.get("B").unwrap(), ["A"]);
        assert_eq!(adjacency.len(), 4);
    }

    #[test]
    fn test_adjacency_list_ties_follow_sorted_edges() {
        let graph = undirected(&[("X", "Z"), ("X", "Y")]);
        let adjacency = adjacency_list(&graph);
        assert_eq!(adjacency.get("X").unwrap(), ["Y", "Z"]);
    }

    #[test]
    fn test_adjacency_list_wide_star() {
        const LEAVES: usize = 50_000;
        let mut graph = Graph::new(crate::Directedness::Undirected);
        for i in 0..LEAVES {
            graph.add_edge("hub", format!("leaf{i}"));
        }
        graph.add_edge("hub", "hub");
        let adjacency = adjacency_list(&graph);
        let hub = adjacency.get("hub").unwrap();
        assert_eq!(hub.len(), LEAVES + 1);
        assert_eq!(hub.iter().filter(|n| *n == "hub").count(), 1);
        assert_eq!(adjacency.get("leaf7").unwrap(), ["hub"]);
    }

    #[test]
    fn test_adjacency_list_directed_uses_successors() {
        let mut graph = directed(&[("A", "B"), ("C", "A")]);
        graph.add_node("Q");
        let adjacency = adjacency_list(&graph);
        assert_eq!(adjacency.get("A").unwrap(), ["B"]);
        assert!(adjacency.get("B").unwrap().is_empty());
        assert!(adjacency.get("Q").unwrap().is_empty());
        assert_eq!(
            adjacency.iter().map(|(label, _)| label).collect::<Vec<_>>(),
            vec!["A", "B", "C", "Q"]
        );
    }

    #[quickcheck]
    fn prop_adjacency_list_is_deterministic(ArbRecord(record): ArbRecord) -> bool {
        let graph = Graph::materialize(&record);
        adjacency_list(&graph) == adjacency_list(&graph)
            && adjacency_list(&graph) == adjacency_list(&Graph::materialize(&record))
    }

    #[test]
    fn test_degree() {
        let graph = star();
        assert_eq!(degree(&graph, "O").unwrap(), 3);
        assert_eq!(degree(&graph, "A").unwrap(), 1);
        assert!(matches!(
            degree(&graph, "Z"),
            Err(GraphError::NotFound(_))
        ));
        assert_eq!(total_degree(&graph), 6);
    }

    #[test]
    fn test_is_eulerian() {
        assert!(is_eulerian(&square()));
        assert!(!is_eulerian(&star()));
        assert!(!is_eulerian(&undirected(&[])));

        let mut square_and_triangle = square();
        square_and_triangle.add_edge("W", "X");
        square_and_triangle.add_edge("X", "Y");
        square_and_triangle.add_edge("Y", "W");
        assert!(!is_eulerian(&square_and_triangle));

        let mut isolated = square();
        isolated.add_node("Q");
        assert!(!is_eulerian(&isolated));
    }

    #[test]
    fn test_is_eulerian_directed() {
        assert!(is_eulerian(&directed(&[("A", "B"), ("B", "C"), ("C", "A")])));
        assert!(!is_eulerian(&directed(&[("A", "B"), ("B", "C"), ("A", "C")])));
    }

    #[test]
    fn test_connectivity() {
        let graph = directed(&[("A", "B"), ("C", "B")]);
        assert!(is_connected(&graph));
        assert!(!is_strongly_connected(&graph));
        let mut graph = undirected(&[("A", "B")]);
        graph.add_node("C");
        assert_eq!(connected_components(&graph).len(), 2);
        assert!(!is_connected(&undirected(&[])));
    }

    #[test]
    fn test_distance_measures_on_path() {
        let graph = undirected(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")]);
        assert_eq!(diameter(&graph).unwrap(), 4);
        assert_eq!(radius(&graph).unwrap(), 2);
        assert_eq!(center(&graph).unwrap(), vec!["C"]);
        assert_eq!(eccentricity(&graph, "A").unwrap(), 4);
    }

    #[test]
    fn test_distance_measures_on_square() {
        let graph = square();
        assert_eq!(diameter(&graph).unwrap(), 2);
        assert_eq!(radius(&graph).unwrap(), 2);
        assert_eq!(center(&graph).unwrap(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_distance_measures_not_computable() {
        let mut graph = undirected(&[("A", "B")]);
        graph.add_node("C");
        assert!(matches!(diameter(&graph), Err(GraphError::NotComputable(_))));
        assert!(matches!(radius(&graph), Err(GraphError::NotComputable(_))));
        assert!(matches!(center(&graph), Err(GraphError::NotComputable(_))));
        assert!(matches!(
            diameter(&undirected(&[])),
            Err(GraphError::NotComputable(_))
        ));
        assert!(matches!(
            diameter(&directed(&[("A", "B")])),
            Err(GraphError::NotComputable(_))
        ));
    }

    #[test]
    fn test_directed_cycle_distances() {
        let graph = directed(&[("A", "B"), ("B", "C"), ("C", "A")]);
        assert_eq!(diameter(&graph).unwrap(), 2);
        assert_eq!(radius(&graph).unwrap(), 2);
    }
}
