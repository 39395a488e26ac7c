//! Graph products.
//!
//! Product nodes are pairs `(a, b)` of a node from each factor.  Records
//! only hold string labels, so each pair is flattened to the label `"a,b"`
//! (see [`join_labels`]).  Labels that themselves contain commas are not
//! escaped, so distinct pairs can collide; such factors should be relabeled
//! first.
//!
//! A product is directed if either factor is.  An undirected factor then
//! contributes each of its edges in both directions.

use std::fmt;

use crate::{Graph, util::join_labels};

/// The products [`GraphService`](crate::GraphService) can derive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProductKind {
    Cartesian,
    Tensor,
}

impl ProductKind {
    pub fn apply(self, first: &Graph, second: &Graph) -> Graph {
        match self {
            ProductKind::Cartesian => cartesian_product(first, second),
            ProductKind::Tensor => tensor_product(first, second),
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductKind::Cartesian => f.write_str("cartesian"),
            ProductKind::Tensor => f.write_str("tensor"),
        }
    }
}

/// Builds the Cartesian product: `(u1, u2)` and `(v1, v2)` are adjacent iff
/// `u1 == v1` and `u2 ~ v2`, or `u2 == v2` and `u1 ~ v1`.
pub fn cartesian_product(first: &Graph, second: &Graph) -> Graph {
    let mut product = product_nodes(first, second);
    let directed = product.is_directed();
    let first_edges = edge_pairs(first, directed);
    let second_edges = edge_pairs(second, directed);

    for a in first.nodes() {
        for &(x, y) in &second_edges {
            product.add_edge(join_labels(a, x), join_labels(a, y));
        }
    }
    for &(a, b) in &first_edges {
        for x in second.nodes() {
            product.add_edge(join_labels(a, x), join_labels(b, x));
        }
    }
    product
}

/// Builds the tensor (categorical) product: `(u1, u2)` and `(v1, v2)` are
/// adjacent iff `u1 ~ v1` and `u2 ~ v2`.
pub fn tensor_product(first: &Graph, second: &Graph) -> Graph {
    let mut product = product_nodes(first, second);
    let directed = product.is_directed();
    let first_edges = edge_pairs(first, directed);
    let second_edges = edge_pairs(second, directed);

    for &(a, b) in &first_edges {
        for &(x, y) in &second_edges {
            product.add_edge(join_labels(a, x), join_labels(b, y));
            if !directed {
                product.add_edge(join_labels(a, y), join_labels(b, x));
            }
        }
    }
    product
}

/// Creates the product graph with all node pairs, in the order of the first
/// factor's nodes and then the second's.
fn product_nodes(first: &Graph, second: &Graph) -> Graph {
    let mut product = Graph::new(first.directedness().combine(second.directedness()));
    for a in first.nodes() {
        for x in second.nodes() {
            product.add_node(join_labels(a, x));
        }
    }
    product
}

/// Lists a factor's edges as ordered pairs.  When the product is directed,
/// undirected edges are listed in both directions.
fn edge_pairs(graph: &Graph, directed: bool) -> Vec<(&str, &str)> {
    let mut pairs = Vec::with_capacity(graph.edge_count() * 2);
    for (source, target) in graph.edges() {
        pairs.push((source, target));
        if directed && !graph.is_directed() && source != target {
            pairs.push((target, source));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph_test_support::{directed, square, undirected};

    #[test]
    fn test_cartesian_product_of_two_edges() {
        let g1 = undirected(&[("A", "B")]);
        let g2 = undirected(&[("X", "Y")]);
        let product = cartesian_product(&g1, &g2);
        assert!(!product.is_directed());
        assert_eq!(
            product.nodes().collect::<Vec<_>>(),
            vec!["A,X", "A,Y", "B,X", "B,Y"]
        );
        assert_eq!(product.edge_count(), 4);
        assert!(product.contains_edge("A,X", "A,Y"));
        assert!(product.contains_edge("B,X", "B,Y"));
        assert!(product.contains_edge("A,X", "B,X"));
        assert!(product.contains_edge("A,Y", "B,Y"));
        assert!(!product.contains_edge("A,X", "B,Y"));
    }

    #[test]
    fn test_tensor_product_of_two_edges() {
        let g1 = undirected(&[("A", "B")]);
        let g2 = undirected(&[("X", "Y")]);
        let product = tensor_product(&g1, &g2);
        assert_eq!(product.node_count(), 4);
        assert_eq!(product.edge_count(), 2);
        assert!(product.contains_edge("A,X", "B,Y"));
        assert!(product.contains_edge("A,Y", "B,X"));
    }

    #[test]
    fn test_cartesian_product_sizes() {
        // |E| = |V1||E2| + |E1||V2|
        let product = cartesian_product(&square(), &undirected(&[("X", "Y"), ("Y", "Z")]));
        assert_eq!(product.node_count(), 12);
        assert_eq!(product.edge_count(), 4 * 2 + 4 * 3);
    }

    #[test]
    fn test_directed_products() {
        let g1 = directed(&[("A", "B")]);
        let g2 = directed(&[("X", "Y")]);
        let product = cartesian_product(&g1, &g2);
        assert!(product.is_directed());
        assert!(product.contains_edge("A,X", "A,Y"));
        assert!(!product.contains_edge("A,Y", "A,X"));

        let product = tensor_product(&g1, &g2);
        assert_eq!(
            product.edges().collect::<Vec<_>>(),
            vec![("A,X", "B,Y")]
        );
    }

    #[test]
    fn test_mixed_product_is_directed() {
        let g1 = directed(&[("A", "B")]);
        let g2 = undirected(&[("X", "Y")]);
        let product = cartesian_product(&g1, &g2);
        assert!(product.is_directed());
        assert!(product.contains_edge("A,X", "A,Y"));
        assert!(product.contains_edge("A,Y", "A,X"));
        assert!(product.contains_edge("A,X", "B,X"));
        assert!(!product.contains_edge("B,X", "A,X"));

        let product = ProductKind::Tensor.apply(&g1, &g2);
        assert_eq!(product.edge_count(), 2);
        assert!(product.contains_edge("A,X", "B,Y"));
        assert!(product.contains_edge("A,Y", "B,X"));
    }

    #[test]
    fn test_product_with_empty_factor() {
        let product = cartesian_product(&square(), &undirected(&[]));
        assert!(product.is_empty());
        assert_eq!(product.edge_count(), 0);
    }
}
