//! A paper authored by an author at an organization, end to end.

use crate::e2e_tests::helpers::*;
use crate::resolver::ResolvedValue;
use crate::vocab::{self, EntityKind};

fn scenario() -> TestGraph {
    TestGraph::new(&document(
        "ex:P1 a schema:ScholarlyArticle ; schema:name \"Linked Research\" ; schema:author ex:A1 .\n\
         ex:A1 a foaf:Person ; foaf:name \"Li Wei\" ; schema:affiliation ex:O1 .\n\
         ex:O1 a schema:Organization ; schema:name \"BUPT\" .\n",
    ))
}

#[test]
fn test_get_by_id_includes_authorship() {
    let test = scenario();
    let snapshot = test.snapshot();
    let record = snapshot.engine().get_by_id(&ex("P1")).unwrap();

    assert_eq!(record.kind, EntityKind::Paper);
    assert_eq!(record.label.as_deref(), Some("Linked Research"));
    assert!(record.statements.iter().any(|statement| {
        &*statement.predicate == vocab::SCHEMA_AUTHOR
            && statement.object_resource().map(|id| &**id) == Some(ex("A1").as_str())
    }));
}

#[test]
fn test_cross_reference_authored_by() {
    let test = scenario();
    let snapshot = test.snapshot();
    let engine = snapshot.engine();

    let authors = engine.cross_reference(&ex("P1"), "authoredBy").unwrap();
    assert_eq!(summary_ids(&authors), vec![ex("A1")]);
    assert_eq!(authors[0].label.as_deref(), Some("Li Wei"));

    // Traversed from the other end, the same relation finds the paper.
    let papers = engine.cross_reference(&ex("A1"), "authoredBy").unwrap();
    assert_eq!(summary_ids(&papers), vec![ex("P1")]);

    let organizations = engine.cross_reference(&ex("A1"), "affiliation").unwrap();
    assert_eq!(summary_ids(&organizations), vec![ex("O1")]);
}

#[test]
fn test_list_papers_includes_p1() {
    let test = scenario();
    let snapshot = test.snapshot();
    let page = snapshot.engine().list_by_type("Paper", 1, Some(10), None);
    assert!(page.total >= 1);
    assert!(page_ids(&page).contains(&ex("P1")));
}

#[test]
fn test_resolver_labels_author_and_links_back() {
    let test = scenario();
    let snapshot = test.snapshot();
    let resolver = snapshot.resolver();

    let paper = resolver.resolve(&ex("P1")).unwrap();
    let authors = paper
        .properties
        .iter()
        .find(|group| &*group.predicate == vocab::SCHEMA_AUTHOR)
        .unwrap();
    match &authors.values[..] {
        [ResolvedValue::Resource(author)] => {
            assert_eq!(author.label.as_deref(), Some("Li Wei"));
            assert_eq!(author.kind, Some(EntityKind::Author));
        }
        other => panic!("unexpected author values: {other:?}"),
    }

    let author = resolver.resolve(&ex("A1")).unwrap();
    assert_eq!(author.incoming.len(), 1);
    assert_eq!(summary_ids(&author.incoming[0].subjects), vec![ex("P1")]);
}

#[test]
fn test_statistics() {
    let test = scenario();
    let stats = test.snapshot().engine().statistics();
    assert_eq!(stats.papers, 1);
    assert_eq!(stats.authors, 1);
    assert_eq!(stats.organizations, 1);
    assert_eq!(stats.triples, 8);
}
