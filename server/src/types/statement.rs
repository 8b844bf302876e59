use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::term::{BLANK_NODE_PREFIX, Term};

/// A statement, readonly.
///
/// INVARIANT: `subject` and `predicate` are non-empty. Construct through
/// `Statement::new` to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    pub subject: Arc<str>,
    pub predicate: Arc<str>,
    pub object: Term,
}

/// Returned when a statement would violate its invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    EmptySubject,
    EmptyPredicate,
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "statement subject must not be empty"),
            Self::EmptyPredicate => write!(f, "statement predicate must not be empty"),
        }
    }
}

impl std::error::Error for StatementError {}

impl Statement {
    /// Create a statement, rejecting empty identifiers.
    pub fn new(subject: Arc<str>, predicate: Arc<str>, object: Term) -> Result<Self, StatementError> {
        if subject.trim().is_empty() {
            return Err(StatementError::EmptySubject);
        }
        if predicate.trim().is_empty() {
            return Err(StatementError::EmptyPredicate);
        }
        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    /// The object's resource identifier, if the object is a resource.
    #[must_use]
    pub fn object_resource(&self) -> Option<&Arc<str>> {
        self.object.as_resource()
    }
}

impl fmt::Display for Statement {
    /// Formats as an N-Triples line (without the trailing newline).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.starts_with(BLANK_NODE_PREFIX) {
            write!(f, "{} ", self.subject)?;
        } else {
            write!(f, "<{}> ", self.subject)?;
        }
        write!(f, "<{}> {} .", self.predicate, self.object)
    }
}
