//! Unknown identifiers and impossible arguments.

use crate::e2e_tests::helpers::*;
use crate::query::QueryError;
use crate::testing::{PAPER_1, SAMPLE_TURTLE};

#[test]
fn test_unknown_identifier() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let missing = ex("missing");

    assert!(matches!(engine.get_by_id(&missing), Err(QueryError::NotFound(_))));
    assert!(matches!(
        engine.cross_reference(&missing, "authoredBy"),
        Err(QueryError::NotFound(_))
    ));
    assert!(matches!(
        snapshot.resolver().resolve(&missing),
        Err(QueryError::NotFound(_))
    ));
    assert!(!engine.resource_exists(&missing));
}

#[test]
fn test_empty_identifier_is_invalid() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    assert!(matches!(engine.get_by_id(""), Err(QueryError::InvalidArgument(_))));
    assert!(matches!(
        engine.cross_reference(PAPER_1, " "),
        Err(QueryError::InvalidArgument(_))
    ));
}

#[test]
fn test_unknown_relation_is_empty() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let related = test
        .snapshot()
        .engine()
        .cross_reference(PAPER_1, "http://example.org/unrelated")
        .unwrap();
    assert!(related.is_empty());
}
