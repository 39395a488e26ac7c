#![cfg(test)]

use quickcheck::{Arbitrary, Gen};

use crate::{Graph, GraphRecord, directedness::Directedness};

const LABELS: &[&str] = &["A", "B", "C", "D", "E", "F", "G", "H"];

/// An arbitrary, possibly messy, stored record: labels may repeat, edges may
/// name nodes missing from the node list, and undirected edges may appear in
/// both orientations.
#[derive(Debug, Clone)]
pub struct ArbRecord(pub GraphRecord);

impl Arbitrary for ArbRecord {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_nodes = usize::arbitrary(g) % 8; // Limit size for testing
        let num_edges = usize::arbitrary(g) % 16;
        let label = |g: &mut Gen| g.choose(LABELS).copied().unwrap_or("A");

        let mut record = GraphRecord::new("arb", bool::arbitrary(g));
        record.nodes = (0..num_nodes).map(|_| label(g).to_string()).collect();
        record.edges = (0..num_edges)
            .map(|_| (label(g).to_string(), label(g).to_string()))
            .collect();
        ArbRecord(record)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let record = self.0.clone();
        Box::new(
            (record.nodes.clone(), record.edges.clone())
                .shrink()
                .map(move |(nodes, edges)| {
                    ArbRecord(GraphRecord {
                        nodes,
                        edges,
                        ..record.clone()
                    })
                }),
        )
    }
}

fn build(directedness: Directedness, edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new(directedness);
    for (source, target) in edges {
        graph.add_edge(*source, *target);
    }
    graph
}

pub fn undirected(edges: &[(&str, &str)]) -> Graph {
    build(Directedness::Undirected, edges)
}

pub fn directed(edges: &[(&str, &str)]) -> Graph {
    build(Directedness::Directed, edges)
}

/// The 4-cycle A-B-C-D-A.
pub fn square() -> Graph {
    undirected(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")])
}

/// A center node joined to three leaves.
pub fn star() -> Graph {
    undirected(&[("O", "A"), ("O", "B"), ("O", "C")])
}

/// Checks that a node sequence is a Hamiltonian cycle of `graph`.
pub fn is_hamiltonian_cycle(graph: &Graph, cycle: &[String]) -> bool {
    let mut sorted: Vec<_> = cycle.iter().map(String::as_str).collect();
    sorted.sort();
    let mut nodes: Vec<_> = graph.nodes().collect();
    nodes.sort();
    sorted == nodes
        && cycle
            .windows(2)
            .all(|pair| graph.contains_edge(&pair[0], &pair[1]))
        && match (cycle.first(), cycle.last()) {
            (Some(first), Some(last)) => graph.contains_edge(last, first),
            _ => false,
        }
}
