//! Reload swaps the whole snapshot atomically, or not at all.

use crate::e2e_tests::helpers::*;
use crate::service::ServiceError;
use crate::turtle::LoadError;

#[test]
fn test_reload_serves_new_graph() {
    let test = TestGraph::new(&five_papers());
    let old = test.snapshot();

    test.file.rewrite(&document(
        "ex:only a schema:ScholarlyArticle ; schema:name \"Only\" .\n",
    ));
    test.service.reload().unwrap();

    let new = test.snapshot();
    assert_eq!(new.engine().list_by_type("paper", 1, None, None).total, 1);
    assert!(new.engine().get_by_id(&ex("paper_0")).is_err());
    // A reader that took the old snapshot keeps a consistent view.
    assert_eq!(old.engine().list_by_type("paper", 1, None, None).total, 5);
    assert!(old.engine().get_by_id(&ex("paper_0")).is_ok());
}

#[test]
fn test_failed_reload_keeps_serving() {
    let test = TestGraph::new(&five_papers());
    test.file.rewrite("ex:broken a ");
    assert!(matches!(
        test.service.reload(),
        Err(ServiceError::Load(LoadError::Parse { .. }))
    ));
    assert_eq!(
        test.snapshot().engine().list_by_type("paper", 1, None, None).total,
        5
    );
}

#[test]
fn test_reload_after_file_removed() {
    let test = TestGraph::new(&five_papers());
    std::fs::remove_file(&test.file.path).unwrap();
    assert!(matches!(
        test.service.reload(),
        Err(ServiceError::Load(LoadError::NotFound(_)))
    ));
    assert_eq!(test.snapshot().generation(), 1);
}

#[test]
fn test_concurrent_readers_during_reload() {
    let test = TestGraph::new(&five_papers());
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let total = test
                        .snapshot()
                        .engine()
                        .list_by_type("paper", 1, None, None)
                        .total;
                    assert_eq!(total, 5);
                }
            });
        }
        for _ in 0..5 {
            test.service.reload().unwrap();
        }
    });
    assert_eq!(test.snapshot().generation(), 6);
}
