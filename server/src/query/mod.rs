//! Query engine over a loaded graph and its index.
//!
//! Supports:
//! - lookup by identifier
//! - paginated listing by entity kind, ordered by label or identifier
//! - case-insensitive substring search over labelled literals
//! - cross-reference traversal along a named relation, in both directions
//! - statistics, co-authors, papers by author or year, organization members
//!
//! # Example
//!
//! ```ignore
//! let graph = load_graph(path)?;
//! let index = Index::build(&graph, &IndexSettings::default());
//! let settings = QuerySettings::default();
//! let engine = QueryEngine::new(&graph, &index, &settings);
//!
//! let page = engine.list_by_type("paper", 1, Some(10), None);
//! for summary in &page.items {
//!     println!("{} {:?}", summary.id, summary.label);
//! }
//! ```

mod engine;
mod types;

use std::fmt;

pub use crate::index::SortKey;
pub use engine::QueryEngine;
pub use types::{
    AuthorRow, EntityRecord, EntitySummary, Page, PaperDetail, PaperRow, QuerySettings, Statistics,
};

/// Errors returned by query operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The identifier is not in the graph.
    NotFound(String),
    /// An argument that cannot be clamped into range, such as an empty
    /// identifier.
    InvalidArgument(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "resource not found: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl std::error::Error for QueryError {}
