//! Turtle loading and serialization.
//!
//! `load_graph` reads a triple file into a `Graph`; `write_turtle` and
//! `write_jsonld` render statements back out for the `text/turtle` and
//! `application/ld+json` representations.

mod chars;
mod error;
mod jsonld;
mod lexer;
mod parser;
mod token;
mod writer;

use std::path::Path;

pub use error::{LoadError, ParseError};
pub use jsonld::write_jsonld;
pub use writer::write_turtle;

use crate::graph::{Graph, GraphBuilder};
use parser::Parser;

/// Parse a Turtle document held in memory.
///
/// # Post-conditions
///
/// - Statements appear in document order.
/// - Anonymous blank nodes get labels that do not collide with labels
///   written in the document.
pub fn parse_graph(input: &str) -> Result<Graph, ParseError> {
    let mut builder = GraphBuilder::new();
    Parser::new(input, &mut builder)?.parse()?;
    Ok(builder.finish())
}

/// Read and parse a triple file.
///
/// A missing file is reported as `LoadError::NotFound`, distinct from other
/// read failures.
pub fn load_graph(path: &Path) -> Result<Graph, LoadError> {
    let input = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let graph = parse_graph(&input).map_err(|error| LoadError::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    tracing::debug!(
        path = %path.display(),
        statements = graph.len(),
        "Parsed triple file"
    );
    Ok(graph)
}
