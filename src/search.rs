use std::collections::{HashSet, VecDeque};

use crate::Graph;

const DEFAULT_HASH_SET_CAPACITY: usize = 64;

/// Breadth-first traversal yielding each reachable node with its distance
/// (number of edges) from the nearest start node.  Edges are followed in
/// the direction reported by [`Graph::neighbors`].
pub struct BfsIterator<'g> {
    graph: &'g Graph,
    visited: HashSet<&'g str>,
    queue: VecDeque<(&'g str, usize)>,
}

impl<'g> BfsIterator<'g> {
    pub fn new(graph: &'g Graph, start: Vec<&'g str>) -> Self {
        Self {
            graph,
            visited: HashSet::with_capacity(DEFAULT_HASH_SET_CAPACITY),
            queue: start.into_iter().map(|label| (label, 0)).collect(),
        }
    }
}

impl<'g> Iterator for BfsIterator<'g> {
    type Item = (&'g str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((label, distance)) = self.queue.pop_front() {
            if !self.visited.insert(label) {
                continue;
            }
            for neighbor in self.graph.neighbors(label) {
                if !self.visited.contains(neighbor) {
                    self.queue.push_back((neighbor, distance + 1));
                }
            }
            return Some((label, distance));
        }
        None
    }
}

impl Graph {
    /// Performs a breadth-first search starting from the given node.
    pub fn bfs<'g>(&'g self, start: &'g str) -> BfsIterator<'g> {
        BfsIterator::new(self, vec![start])
    }
}
