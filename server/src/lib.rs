#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
// Life of a request:
// 1. Startup loads the Turtle file into a statement arena (turtle, graph)
// 2. One pass over the arena builds the index (index)
// 3. The service publishes graph + index as an immutable snapshot
// 4. Each request clones the current snapshot and reads from it:
//     - Listing, search, cross-references -> QueryEngine
//     - Resource pages -> Resolver
// 5. A reload builds a new snapshot off to the side and swaps it in
//
// System components:
//  - Turtle loader and writer
//  - Statement arena and index
//  - Query engine and resolver
//  - Reload-capable graph service

pub mod config;
pub mod entity;
pub mod graph;
pub mod index;
pub mod query;
pub mod resolver;
pub mod service;
pub mod turtle;
pub mod types;
pub mod vocab;

#[cfg(test)]
mod simulation;

pub use config::{ConfigError, GraphConfig, ServerConfig};
pub use graph::Graph;
pub use index::{Index, IndexSettings};
pub use query::{QueryEngine, QueryError, QuerySettings};
pub use resolver::Resolver;
pub use service::{GraphService, GraphSnapshot, ServiceError};
