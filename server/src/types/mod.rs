//! Core value types: terms, literals and statements.

mod statement;
mod term;

pub use statement::{Statement, StatementError};
pub use term::{BLANK_NODE_PREFIX, Literal, LiteralValue, Term, escape_string};
