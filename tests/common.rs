#![allow(dead_code)]

use std::{fs, path::PathBuf};

use graphstore::{Config, FileStore, GraphService};
use tempfile::TempDir;

/// A service backed by a fresh store directory that is removed on drop.
pub struct Fixture {
    pub dir: TempDir,
    pub service: GraphService<FileStore>,
}

impl Fixture {
    pub fn new() -> Self {
        graphstore::tracing_support::init_tracing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::default().with_graphs_dir(dir.path().join("graphs"));
        let service = GraphService::with_config(FileStore::from_config(&config), config);
        Fixture { dir, service }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join("graphs").join(format!("{name}.json"))
    }

    pub fn contents(&self, name: &str) -> Vec<u8> {
        fs::read(self.path(name)).expect("read stored graph")
    }

    /// Creates an undirected graph from an edge list.
    pub fn undirected(&mut self, name: &str, edges: &[(&str, &str)]) {
        self.service.create_graph(name, false).expect("create graph");
        for (source, target) in edges {
            self.service
                .add_edge(name, source, target)
                .expect("add edge");
        }
    }
}
