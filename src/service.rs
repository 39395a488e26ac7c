//! Named-graph operations over a [`GraphStore`].
//!
//! Each operation reads the whole record it needs, materializes a fresh
//! [`Graph`], and, if the operation changes or derives a graph, writes a
//! whole record back.  An operation that fails writes nothing, so the stored
//! records are left exactly as they were.

use crate::{
    Graph, GraphRecord,
    config::Config,
    error::{GraphError, Result},
    hamiltonian::{HamiltonianSearch, SearchOutcome},
    product::ProductKind,
    queries::{self, AdjacencyList},
    store::GraphStore,
    tree::{self, BINARY_SUFFIX, TREE_SUFFIX, Tree},
};

/// Operations on graphs held in a store `S`.
#[derive(Debug)]
pub struct GraphService<S> {
    store: S,
    config: Config,
}

impl<S: GraphStore> GraphService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // Creation and loading

    /// Creates an empty graph.  Fails with [`GraphError::AlreadyExists`]
    /// rather than replacing an existing graph.
    pub fn create_graph(&mut self, name: &str, directed: bool) -> Result<GraphRecord> {
        let _span = tracing::info_span!("create_graph", graph = name, directed).entered();
        self.create(GraphRecord::new(name, directed))
    }

    /// Creates a graph seeded with the contents of `record`, normalized the
    /// way [`Graph::materialize`] normalizes stored records.
    pub fn create_graph_from(&mut self, record: &GraphRecord) -> Result<GraphRecord> {
        let _span = tracing::info_span!("create_graph_from", graph = %record.name).entered();
        self.create(Graph::materialize(record).to_record(record.name.as_str()))
    }

    fn create(&mut self, record: GraphRecord) -> Result<GraphRecord> {
        report(self.write_new(&record))?;
        tracing::debug!(
            nodes = record.nodes.len(),
            edges = record.edges.len(),
            "created graph"
        );
        Ok(record)
    }

    /// Reads and materializes a stored graph.
    pub fn load(&self, name: &str) -> Result<Graph> {
        let record = self.store.read(name)?;
        Ok(Graph::materialize(&record))
    }

    // Mutation

    /// Adds a node, returning whether it was new.
    pub fn add_node(&mut self, name: &str, label: &str) -> Result<bool> {
        let _span = tracing::info_span!("add_node", graph = name, label).entered();
        self.update(name, |graph| Ok(graph.add_node(label)))
    }

    /// Removes a node and its edges.
    pub fn remove_node(&mut self, name: &str, label: &str) -> Result<()> {
        let _span = tracing::info_span!("remove_node", graph = name, label).entered();
        self.update(name, |graph| graph.remove_node(label))
    }

    /// Adds an edge and any missing endpoints, returning whether the edge
    /// was new.
    pub fn add_edge(&mut self, name: &str, source: &str, target: &str) -> Result<bool> {
        let _span = tracing::info_span!("add_edge", graph = name, source, target).entered();
        self.update(name, |graph| Ok(graph.add_edge(source, target)))
    }

    pub fn remove_edge(&mut self, name: &str, source: &str, target: &str) -> Result<()> {
        let _span = tracing::info_span!("remove_edge", graph = name, source, target).entered();
        self.update(name, |graph| graph.remove_edge(source, target))
    }

    /// Renames a node.  See [`Graph::relabel_node`] for what happens when
    /// `new` already exists.
    pub fn rename_node(&mut self, name: &str, old: &str, new: &str) -> Result<()> {
        let _span = tracing::info_span!("rename_node", graph = name, old, new).entered();
        self.update(name, |graph| graph.relabel_node(old, new))
    }

    fn update<T>(&mut self, name: &str, op: impl FnOnce(&mut Graph) -> Result<T>) -> Result<T> {
        let result = self.load(name).and_then(|mut graph| {
            let value = op(&mut graph)?;
            self.store.write(&graph.to_record(name))?;
            tracing::debug!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "updated graph"
            );
            Ok(value)
        });
        report(result)
    }

    // Queries

    pub fn degree(&self, name: &str, label: &str) -> Result<usize> {
        let _span = tracing::info_span!("degree", graph = name, label).entered();
        self.query(name, |graph| queries::degree(graph, label))
    }

    pub fn total_degree(&self, name: &str) -> Result<usize> {
        let _span = tracing::info_span!("total_degree", graph = name).entered();
        self.query(name, |graph| Ok(queries::total_degree(graph)))
    }

    pub fn is_eulerian(&self, name: &str) -> Result<bool> {
        let _span = tracing::info_span!("is_eulerian", graph = name).entered();
        self.query(name, |graph| Ok(queries::is_eulerian(graph)))
    }

    pub fn diameter(&self, name: &str) -> Result<usize> {
        let _span = tracing::info_span!("diameter", graph = name).entered();
        self.query(name, queries::diameter)
    }

    pub fn radius(&self, name: &str) -> Result<usize> {
        let _span = tracing::info_span!("radius", graph = name).entered();
        self.query(name, queries::radius)
    }

    pub fn center(&self, name: &str) -> Result<Vec<String>> {
        let _span = tracing::info_span!("center", graph = name).entered();
        self.query(name, queries::center)
    }

    pub fn adjacency_list(&self, name: &str) -> Result<AdjacencyList> {
        let _span = tracing::info_span!("adjacency_list", graph = name).entered();
        self.query(name, |graph| Ok(queries::adjacency_list(graph)))
    }

    /// Searches for a Hamiltonian cycle, giving up after the configured
    /// timeout if there is one.
    pub fn hamiltonian_cycle(&self, name: &str) -> Result<SearchOutcome> {
        let _span = tracing::info_span!("hamiltonian_cycle", graph = name).entered();
        self.query(name, |graph| Ok(self.search(graph).cycle()))
    }

    /// Searches for a Hamiltonian path, giving up after the configured
    /// timeout if there is one.
    pub fn hamiltonian_path(&self, name: &str) -> Result<SearchOutcome> {
        let _span = tracing::info_span!("hamiltonian_path", graph = name).entered();
        self.query(name, |graph| Ok(self.search(graph).path()))
    }

    fn search<'g>(&self, graph: &'g Graph) -> HamiltonianSearch<'g> {
        let search = HamiltonianSearch::new(graph);
        match self.config.hamiltonian_timeout {
            Some(timeout) => search.with_timeout(timeout),
            None => search,
        }
    }

    fn query<T>(&self, name: &str, op: impl FnOnce(&Graph) -> Result<T>) -> Result<T> {
        report(self.load(name).and_then(|graph| op(&graph)))
    }

    // Derived graphs

    /// Builds the spanning tree of `root`'s component and stores it as
    /// `<name>-tree`.  Whatever is stored under that name is replaced, even
    /// a graph that was created directly rather than derived.
    pub fn build_tree(&mut self, name: &str, root: &str) -> Result<GraphRecord> {
        let _span = tracing::info_span!("build_tree", graph = name, root).entered();
        self.derive_tree(name, TREE_SUFFIX, |graph| tree::build_tree(graph, root, None))
    }

    /// Builds a tree with at most two children per node and stores it as
    /// `<name>-binary`, replacing whatever is stored under that name.
    pub fn build_binary_tree(&mut self, name: &str, root: &str) -> Result<GraphRecord> {
        let _span = tracing::info_span!("build_binary_tree", graph = name, root).entered();
        self.derive_tree(name, BINARY_SUFFIX, |graph| {
            tree::build_binary_tree(graph, root)
        })
    }

    fn derive_tree(
        &mut self,
        name: &str,
        suffix: &str,
        build: impl FnOnce(&Graph) -> Result<Tree>,
    ) -> Result<GraphRecord> {
        let result = self.load(name).and_then(|graph| {
            let tree = build(&graph)?;
            let record = tree.to_record(format!("{name}{suffix}"), graph.directedness());
            self.store.write(&record)?;
            tracing::debug!(
                derived = %record.name,
                nodes = tree.node_count(),
                skipped = graph.node_count() - tree.node_count(),
                "stored tree"
            );
            Ok(record)
        });
        report(result)
    }

    /// Stores the Cartesian product of two graphs under `product_name`.
    pub fn cartesian_product(
        &mut self,
        first: &str,
        second: &str,
        product_name: &str,
    ) -> Result<GraphRecord> {
        let _span =
            tracing::info_span!("cartesian_product", first, second, product = product_name)
                .entered();
        self.derive_product(ProductKind::Cartesian, first, second, product_name)
    }

    /// Stores the tensor product of two graphs under `product_name`.
    pub fn tensor_product(
        &mut self,
        first: &str,
        second: &str,
        product_name: &str,
    ) -> Result<GraphRecord> {
        let _span =
            tracing::info_span!("tensor_product", first, second, product = product_name)
                .entered();
        self.derive_product(ProductKind::Tensor, first, second, product_name)
    }

    fn derive_product(
        &mut self,
        kind: ProductKind,
        first: &str,
        second: &str,
        product_name: &str,
    ) -> Result<GraphRecord> {
        let result = (|| -> Result<GraphRecord> {
            let first = self.load(first)?;
            let second = self.load(second)?;
            let record = kind.apply(&first, &second).to_record(product_name);
            self.write_new(&record)?;
            tracing::debug!(
                %kind,
                nodes = record.nodes.len(),
                edges = record.edges.len(),
                "stored product"
            );
            Ok(record)
        })();
        report(result)
    }

    /// Stores the subgraph of `name` induced by `labels` under
    /// `subgraph_name`.
    pub fn subgraph(
        &mut self,
        name: &str,
        labels: &[&str],
        subgraph_name: &str,
    ) -> Result<GraphRecord> {
        let _span =
            tracing::info_span!("subgraph", graph = name, subgraph = subgraph_name).entered();
        let result = self.load(name).and_then(|graph| {
            let record = graph
                .subgraph(labels.iter().copied())?
                .to_record(subgraph_name);
            self.write_new(&record)?;
            tracing::debug!(nodes = record.nodes.len(), "stored subgraph");
            Ok(record)
        });
        report(result)
    }

    fn write_new(&mut self, record: &GraphRecord) -> Result<()> {
        if self.store.exists(&record.name)? {
            return Err(GraphError::AlreadyExists(record.name.clone()));
        }
        self.store.write(record)
    }
}

/// Logs a failed operation: conditions the caller caused as warnings, store
/// failures as errors.
fn report<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if err.is_recoverable() {
            tracing::warn!(%err, "operation failed");
        } else {
            tracing::error!(%err, "store failure");
        }
    }
    result
}
