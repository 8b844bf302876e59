//! The loaded graph: an ordered, immutable arena of statements.
//!
//! Statements are stored once, in document order. Every identifier is
//! interned while building, so repeated subjects, predicates and objects
//! share a single `Arc<str>` allocation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{Statement, StatementError, Term};

/// The full, ordered sequence of statements loaded from a triple file.
///
/// # Invariants
///
/// - Read-only after construction.
/// - Statement positions are stable for the lifetime of the graph; the index
///   refers to statements by position.
#[derive(Debug, Default)]
pub struct Graph {
    statements: Vec<Statement>,
}

impl Graph {
    /// Build a graph from already validated statements.
    #[must_use]
    pub const fn from_statements(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Get a statement by position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Statement> {
        self.statements.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Accumulates statements while a document is parsed.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    interned: HashSet<Arc<str>>,
    statements: Vec<Statement>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared copy of `value`, allocating it on first use.
    pub fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.interned.get(value) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(value);
        self.interned.insert(Arc::clone(&shared));
        shared
    }

    /// Append a statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject or predicate is empty.
    pub fn push(
        &mut self,
        subject: Arc<str>,
        predicate: Arc<str>,
        object: Term,
    ) -> Result<(), StatementError> {
        self.statements.push(Statement::new(subject, predicate, object)?);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Graph {
        Graph::from_statements(self.statements)
    }
}
