//! Hamiltonian path and cycle search.
//!
//! The search is an iterative depth-first backtracking search over node
//! permutations, driven by an explicit stack of visit and backtrack frames
//! instead of recursion.  Its only pruning is that a node already on the
//! current path is never revisited, so the worst case is factorial in the
//! number of nodes.  It is meant for small graphs; use
//! [`HamiltonianSearch::with_deadline`] or
//! [`HamiltonianSearch::with_step_limit`] to bound the work on anything
//! larger.

use std::time::{Duration, Instant};

use crate::Graph;

/// How often the deadline is checked, in stack frames.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// A unit of work on the search stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
    /// Extend the current path with this node.
    Visit(usize),
    /// Every extension of the current path has been tried; drop its last
    /// node.
    Backtrack,
}

/// The result of a bounded search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The nodes of the path or cycle, in order.  A cycle is reported
    /// without repeating its first node.
    Found(Vec<String>),
    /// The search space was exhausted.
    NotFound,
    /// The deadline or step limit was hit first.
    Aborted,
}

impl SearchOutcome {
    /// Converts to an `Option`, treating an aborted search as not found.
    pub fn found(self) -> Option<Vec<String>> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::NotFound | SearchOutcome::Aborted => None,
        }
    }
}

#[cfg(feature = "bitvec")]
struct OnPath(bitvec::vec::BitVec);

#[cfg(feature = "bitvec")]
impl OnPath {
    fn new(len: usize) -> Self {
        OnPath(bitvec::vec::BitVec::repeat(false, len))
    }

    fn get(&self, node: usize) -> bool {
        self.0[node]
    }

    fn set(&mut self, node: usize, value: bool) {
        self.0.set(node, value);
    }
}

#[cfg(not(feature = "bitvec"))]
struct OnPath(Vec<bool>);

#[cfg(not(feature = "bitvec"))]
impl OnPath {
    fn new(len: usize) -> Self {
        OnPath(vec![false; len])
    }

    fn get(&self, node: usize) -> bool {
        self.0[node]
    }

    fn set(&mut self, node: usize, value: bool) {
        self.0[node] = value;
    }
}

/// A configurable Hamiltonian path or cycle search over one graph.
pub struct HamiltonianSearch<'g> {
    graph: &'g Graph,
    adjacency: Vec<Vec<usize>>,
    deadline: Option<Instant>,
    step_limit: Option<u64>,
}

impl<'g> HamiltonianSearch<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            adjacency: graph.index_adjacency(),
            deadline: None,
            step_limit: None,
        }
    }

    /// Gives up once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Gives up once `timeout` has elapsed from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Gives up after processing `steps` stack frames.
    pub fn with_step_limit(mut self, steps: u64) -> Self {
        self.step_limit = Some(steps);
        self
    }

    /// Searches for a Hamiltonian cycle: a path through every node whose
    /// last node has an edge back to the first.
    ///
    /// Every full-length path from the first node is tried before giving
    /// up.  A Hamiltonian cycle passes through every node, so trying other
    /// start nodes cannot find anything new.
    pub fn cycle(&self) -> SearchOutcome {
        let _span = tracing::debug_span!("hamiltonian_cycle", nodes = self.graph.node_count())
            .entered();
        let mut budget = Budget::new(self.deadline, self.step_limit);
        match self.graph.node_count() {
            0 => SearchOutcome::NotFound,
            _ => self.search_from(0, true, &mut budget),
        }
    }

    /// Searches for a Hamiltonian path, trying each node as the start in
    /// node order.
    pub fn path(&self) -> SearchOutcome {
        let _span =
            tracing::debug_span!("hamiltonian_path", nodes = self.graph.node_count()).entered();
        let mut budget = Budget::new(self.deadline, self.step_limit);
        for start in 0..self.graph.node_count() {
            match self.search_from(start, false, &mut budget) {
                SearchOutcome::NotFound => continue,
                outcome => return outcome,
            }
        }
        SearchOutcome::NotFound
    }

    fn search_from(&self, start: usize, closed: bool, budget: &mut Budget) -> SearchOutcome {
        let n = self.graph.node_count();
        let mut path: Vec<usize> = Vec::with_capacity(n);
        let mut on_path = OnPath::new(n);
        let mut stack = vec![Frame::Visit(start)];

        while let Some(frame) = stack.pop() {
            if budget.exhausted() {
                tracing::debug!(steps = budget.steps, "hamiltonian search aborted");
                return SearchOutcome::Aborted;
            }
            match frame {
                Frame::Visit(node) => {
                    path.push(node);
                    on_path.set(node, true);
                    if path.len() == n {
                        if !closed || self.closes(&path) {
                            return SearchOutcome::Found(self.labels(&path));
                        }
                        path.pop();
                        on_path.set(node, false);
                        continue;
                    }
                    stack.push(Frame::Backtrack);
                    for &next in self.adjacency[node].iter().rev() {
                        if !on_path.get(next) {
                            stack.push(Frame::Visit(next));
                        }
                    }
                }
                Frame::Backtrack => {
                    if let Some(node) = path.pop() {
                        on_path.set(node, false);
                    }
                }
            }
        }
        tracing::trace!(start, steps = budget.steps, "start node exhausted");
        SearchOutcome::NotFound
    }

    fn closes(&self, path: &[usize]) -> bool {
        match (path.first(), path.last()) {
            (Some(&first), Some(&last)) => self.adjacency[last].contains(&first),
            _ => false,
        }
    }

    fn labels(&self, path: &[usize]) -> Vec<String> {
        let nodes: Vec<&str> = self.graph.nodes().collect();
        path.iter().map(|&i| nodes[i].to_string()).collect()
    }
}

struct Budget {
    deadline: Option<Instant>,
    step_limit: Option<u64>,
    steps: u64,
}

impl Budget {
    fn new(deadline: Option<Instant>, step_limit: Option<u64>) -> Self {
        Self {
            deadline,
            step_limit,
            steps: 0,
        }
    }

    fn exhausted(&mut self) -> bool {
        self.steps += 1;
        if self.step_limit.is_some_and(|limit| self.steps > limit) {
            return true;
        }
        self.steps % DEADLINE_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Finds a Hamiltonian cycle with no bound on the search.
pub fn find_hamiltonian_cycle(graph: &Graph) -> Option<Vec<String>> {
    HamiltonianSearch::new(graph).cycle().found()
}

/// Finds a Hamiltonian path with no bound on the search.
pub fn find_hamiltonian_path(graph: &Graph) -> Option<Vec<String>> {
    HamiltonianSearch::new(graph).path().found()
}
