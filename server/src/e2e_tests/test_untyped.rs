//! Entities without a recognized type: indexed, resolvable, never listed.

use crate::e2e_tests::helpers::*;
use crate::vocab::EntityKind;

fn untyped_graph() -> TestGraph {
    TestGraph::new(&document(
        "ex:p a schema:ScholarlyArticle ; schema:name \"Classified\" .\n\
         ex:x schema:name \"No type at all\" .\n\
         ex:y a <http://example.org/Spaceship> ; schema:name \"Unknown type\" .\n",
    ))
}

#[test]
fn test_untyped_entities_resolve() {
    let test = untyped_graph();
    let snapshot = test.snapshot();
    for id in [ex("x"), ex("y")] {
        let record = snapshot.engine().get_by_id(&id).unwrap();
        assert_eq!(record.kind, EntityKind::Untyped);
        assert_eq!(snapshot.resolver().resolve(&id).unwrap().kind, EntityKind::Untyped);
    }
}

#[test]
fn test_untyped_entities_are_not_listed() {
    let test = untyped_graph();
    let snapshot = test.snapshot();
    let engine = snapshot.engine();
    assert_eq!(page_ids(&engine.list_by_type("paper", 1, None, None)), vec![ex("p")]);
    assert!(engine.list_by_type("untyped", 1, None, None).items.is_empty());
    assert_eq!(engine.statistics().untyped, 2);
    assert_eq!(engine.statistics().entities, 3);
}

#[test]
fn test_untyped_entities_are_searchable() {
    let test = untyped_graph();
    let page = test.snapshot().engine().search("type", None, 1, None);
    assert_eq!(page_ids(&page), vec![ex("x"), ex("y")]);
}
