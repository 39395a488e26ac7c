pub mod config;
pub mod directedness;
pub mod error;
pub mod graph;
pub mod hamiltonian;
pub mod product;
pub mod queries;
pub mod record;
pub mod search;
pub mod service;
pub mod store;
pub mod tracing_support;
pub mod tree;

mod edge_ends;
mod graph_test_support;
mod util;

pub use config::Config;
pub use directedness::Directedness;
pub use error::{GraphError, Missing, Result};
pub use graph::Graph;
pub use hamiltonian::{HamiltonianSearch, SearchOutcome};
pub use record::GraphRecord;
pub use service::GraphService;
pub use store::{FileStore, GraphStore, MemoryStore};
