//! Requests past the last page are empty, not errors.

use crate::e2e_tests::helpers::*;

#[test]
fn test_page_999_of_five_papers() {
    let test = TestGraph::new(&five_papers());
    let page = test
        .snapshot()
        .engine()
        .list_by_type("Paper", 999, Some(10), None);

    assert!(page.items.is_empty());
    assert_eq!(page.total, 5);
    assert_eq!(page.page, 999);
    assert!(!page.has_next());
}

#[test]
fn test_invalid_page_arguments_are_clamped() {
    let test = TestGraph::new(&five_papers());
    let snapshot = test.snapshot();
    let engine = snapshot.engine();

    let page = engine.list_by_type("paper", 0, Some(-3), None);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 1);
    assert_eq!(page.items.len(), 1);

    let page = engine.list_by_type("paper", 1, Some(1_000_000), None);
    assert_eq!(page.page_size, 100);
    assert_eq!(page.items.len(), 5);
}

#[test]
fn test_unknown_type_is_empty() {
    let test = TestGraph::new(&five_papers());
    let page = test
        .snapshot()
        .engine()
        .list_by_type("spaceship", 1, None, None);
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}
