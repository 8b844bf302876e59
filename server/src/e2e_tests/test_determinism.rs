//! Loading the same file twice yields identical results.

use crate::e2e_tests::helpers::*;
use crate::index::SortKey;
use crate::testing::{AUTHOR_1, PAPER_3, SAMPLE_TURTLE};
use crate::vocab::EntityKind;

fn observe(test: &TestGraph) -> Vec<String> {
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    let mut out = Vec::new();
    for kind in EntityKind::LISTABLE {
        for sort in [SortKey::Label, SortKey::Identifier] {
            out.extend(page_ids(&engine.list_by_type(kind.as_str(), 1, Some(100), Some(sort))));
        }
    }
    out.extend(page_ids(&engine.search("a", None, 1, Some(100))));
    out.extend(summary_ids(&engine.cross_reference(AUTHOR_1, "authoredBy").unwrap()));
    out.push(format!("{:?}", snapshot.resolver().resolve(PAPER_3).unwrap()));
    out.push(format!("{:?}", engine.statistics()));
    out
}

#[test]
fn test_two_loads_match() {
    let first = TestGraph::new(SAMPLE_TURTLE);
    let second = TestGraph::new(SAMPLE_TURTLE);
    assert_eq!(observe(&first), observe(&second));
}

#[test]
fn test_reload_of_unchanged_file_matches() {
    let test = TestGraph::new(SAMPLE_TURTLE);
    let before = observe(&test);
    test.service.reload().unwrap();
    assert_eq!(observe(&test), before);
}
