//! Search boundaries: empty queries, case, type filters and paging.

use crate::e2e_tests::helpers::*;
use crate::testing::{AUTHOR_2, PAPER_3, SAMPLE_TURTLE};

#[test]
fn test_empty_search_returns_nothing() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    for text in ["", "   ", "\n\t"] {
        for kind in [None, Some("paper"), Some("author")] {
            let page = engine.search(text, kind, 1, None);
            assert_eq!(page.total, 0, "search({text:?}, {kind:?})");
            assert!(page.items.is_empty());
        }
    }
}

#[test]
fn test_empty_search_on_empty_graph() {
    let test = TestGraph::new("");
    assert_eq!(test.snapshot().engine().search("", None, 1, None).total, 0);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let lower = engine.search("network", None, 1, None);
    let upper = engine.search("NETWORK", None, 1, None);
    assert_eq!(lower, upper);
    assert!(lower.total >= 2);
}

#[test]
fn test_search_type_filter() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let everything = engine.search("graph", None, 1, None);
    let papers = engine.search("graph", Some("paper"), 1, None);
    let keywords = engine.search("graph", Some("keyword"), 1, None);
    assert_eq!(everything.total, papers.total + keywords.total);
    assert!(engine.search("graph", Some("spaceship"), 1, None).items.is_empty());
}

#[test]
fn test_search_pages() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let all = engine.search("n", None, 1, Some(100));
    let mut collected = Vec::new();
    for page in 1..=all.total {
        collected.extend(page_ids(&engine.search("n", None, i64::try_from(page).unwrap(), Some(1))));
    }
    assert_eq!(collected, page_ids(&all));
}

#[test]
fn test_paper_search_matches_author_names() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let by_author = engine.search("zhang min", Some("paper"), 1, None);
    assert_eq!(page_ids(&by_author), vec![PAPER_3]);
    let authors = engine.search("zhang min", Some("author"), 1, None);
    assert_eq!(page_ids(&authors), vec![AUTHOR_2]);
}

#[test]
fn test_paper_search_joins_title_and_author_hits() {
    let test = TestGraph::new(&document(
        r#"
ex:p1 a schema:ScholarlyArticle ; schema:name "Curie on Radium" ; schema:author ex:a1 .
ex:p2 a schema:ScholarlyArticle ; schema:name "Polonium" ; schema:author ex:a1 .
ex:p3 a schema:ScholarlyArticle ; schema:name "Radioactivity" ; schema:author ex:a2 .
ex:a1 a foaf:Person ; foaf:name "Marie Curie" .
ex:a2 a foaf:Person ; foaf:name "Henri Becquerel" .
"#,
    ));
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let page = engine.search("CURIE", Some("paper"), 1, None);
    assert_eq!(page.total, 2);
    assert_eq!(page_ids(&page), vec![ex("p1"), ex("p2")]);
    let page = engine.search("curie", Some("paper"), 2, Some(1));
    assert_eq!(page_ids(&page), vec![ex("p2")]);
}
