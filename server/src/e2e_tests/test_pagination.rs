//! Pages are disjoint, cover the listing, and follow label order.

use crate::e2e_tests::helpers::*;
use crate::query::SortKey;

#[test]
fn test_pages_are_disjoint_and_cover() {
    let test = TestGraph::new(&five_papers());
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let all = page_ids(&engine.list_by_type("paper", 1, Some(100), None));

    for page_size in 1..=6 {
        let mut collected = Vec::new();
        let mut page = 1;
        loop {
            let result = engine.list_by_type("paper", page, Some(page_size), None);
            if result.items.is_empty() {
                break;
            }
            collected.extend(page_ids(&result));
            page += 1;
        }
        assert_eq!(collected, all, "page size {page_size}");
    }
}

#[test]
fn test_label_order_ignores_case() {
    let test = TestGraph::new(&five_papers());
    let snapshot = test.snapshot();
    let page = snapshot.engine().list_by_type("papers", 1, None, None);
    let labels: Vec<&str> = page
        .items
        .iter()
        .filter_map(|summary| summary.label.as_deref())
        .collect();
    assert_eq!(labels, vec!["alpha", "bravo", "Charlie", "Delta", "Echo"]);
}

#[test]
fn test_identifier_order() {
    let test = TestGraph::new(&five_papers());
    let snapshot = test.snapshot();
    let page = snapshot
        .engine()
        .list_by_type("paper", 1, None, Some(SortKey::Identifier));
    let expected: Vec<String> = (0..5).map(|i| ex(&format!("paper_{i}"))).collect();
    assert_eq!(page_ids(&page), expected);
}

#[test]
fn test_equal_labels_tie_break_on_identifier() {
    let test = TestGraph::new(&document(
        "ex:b a schema:ScholarlyArticle ; schema:name \"Same\" .\n\
         ex:a a schema:ScholarlyArticle ; schema:name \"same\" .\n\
         ex:c a schema:ScholarlyArticle ; schema:name \"SAME\" .\n",
    ));
    let page = test.snapshot().engine().list_by_type("paper", 1, None, None);
    assert_eq!(page_ids(&page), vec![ex("a"), ex("b"), ex("c")]);
}
