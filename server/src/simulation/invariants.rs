//! Invariant checking for simulated graphs.
//!
//! Each check reads a graph, its index and a query engine over them, and
//! records a violation instead of panicking so a run reports everything
//! that went wrong for its seed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::graph::Graph;
use crate::index::{Index, IndexSettings, SortKey};
use crate::query::{QueryEngine, QuerySettings};
use crate::turtle::parse_graph;
use crate::vocab::{self, EntityKind};

/// A violated invariant.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Short name of the invariant.
    pub invariant: &'static str,
    pub details: String,
}

/// Runs the graph invariants and collects violations.
pub struct InvariantChecker<'a> {
    graph: &'a Graph,
    index: &'a Index,
    settings: &'a QuerySettings,
    violations: Vec<InvariantViolation>,
    checks_run: u64,
}

impl<'a> InvariantChecker<'a> {
    #[must_use]
    pub const fn new(graph: &'a Graph, index: &'a Index, settings: &'a QuerySettings) -> Self {
        Self {
            graph,
            index,
            settings,
            violations: Vec::new(),
            checks_run: 0,
        }
    }

    fn engine(&self) -> QueryEngine<'a> {
        QueryEngine::new(self.graph, self.index, self.settings)
    }

    fn violation(&mut self, invariant: &'static str, details: String) {
        self.violations.push(InvariantViolation { invariant, details });
    }

    #[must_use]
    pub const fn checks_run(&self) -> u64 {
        self.checks_run
    }

    #[must_use]
    pub fn into_violations(self) -> Vec<InvariantViolation> {
        self.violations
    }

    /// The number of indexed entities equals the number of distinct
    /// subjects, and every subject has a kind.
    pub fn check_index_size(&mut self) {
        self.checks_run += 1;
        let (graph, index) = (self.graph, self.index);
        let subjects: HashSet<&str> = graph
            .statements()
            .iter()
            .map(|statement| &*statement.subject)
            .collect();
        if subjects.len() != index.len() {
            self.violation(
                "index_size",
                format!(
                    "{} distinct subjects but {} indexed entities",
                    subjects.len(),
                    index.len()
                ),
            );
        }
        let missing: Vec<&&str> = subjects
            .iter()
            .filter(|subject| index.kind(subject).is_none())
            .collect();
        if !missing.is_empty() {
            self.violation("subject_kind", format!("subjects without a kind: {missing:?}"));
        }
    }

    /// For every kind, sort and page size, pages are disjoint and their
    /// concatenation is the full listing. Pages past the end are empty but
    /// report the total.
    pub fn check_pagination(&mut self, page_sizes: &[usize]) {
        let engine = self.engine();
        for kind in EntityKind::LISTABLE {
            for sort in [SortKey::Label, SortKey::Identifier] {
                let full: Vec<Arc<str>> = self.index.listing(kind, sort).to_vec();
                for &page_size in page_sizes {
                    if page_size > self.settings.max_page_size {
                        continue;
                    }
                    self.checks_run += 1;
                    let size = i64::try_from(page_size).unwrap_or(i64::MAX);
                    let mut collected: Vec<Arc<str>> = Vec::new();
                    let mut page_number = 1;
                    loop {
                        let page = engine.list_by_type(kind.as_str(), page_number, Some(size), Some(sort));
                        if page.total != full.len() {
                            self.violation(
                                "page_total",
                                format!("{kind} page {page_number}: total {} != {}", page.total, full.len()),
                            );
                        }
                        if page.items.len() > page_size {
                            self.violation(
                                "page_size",
                                format!("{kind} page {page_number}: {} items > {page_size}", page.items.len()),
                            );
                        }
                        if page.items.is_empty() {
                            break;
                        }
                        collected.extend(page.items.into_iter().map(|summary| summary.id));
                        page_number += 1;
                    }
                    let distinct: HashSet<&Arc<str>> = collected.iter().collect();
                    if distinct.len() != collected.len() {
                        self.violation(
                            "pages_disjoint",
                            format!("{kind} {sort:?} page size {page_size}: duplicate ids across pages"),
                        );
                    }
                    if collected != full {
                        self.violation(
                            "pages_cover",
                            format!(
                                "{kind} {sort:?} page size {page_size}: pages yield {} ids, listing has {}",
                                collected.len(),
                                full.len()
                            ),
                        );
                    }
                }
            }
        }
    }

    /// Label listings are ordered by lowercase label (identifier when
    /// unlabelled) then identifier; identifier listings by identifier.
    pub fn check_ordering(&mut self) {
        let index = self.index;
        for kind in EntityKind::LISTABLE {
            self.checks_run += 1;
            let by_label = index.listing(kind, SortKey::Label);
            let keys: Vec<(String, &str)> = by_label
                .iter()
                .map(|id| {
                    let label = index.label(id).map_or(&**id, |label| &**label);
                    (label.to_lowercase(), &**id)
                })
                .collect();
            if keys.windows(2).any(|pair| pair[0] > pair[1]) {
                self.violation("label_order", format!("{kind} listing is not in label order"));
            }
            let by_identifier = index.listing(kind, SortKey::Identifier);
            if by_identifier.windows(2).any(|pair| pair[0] >= pair[1]) {
                self.violation(
                    "identifier_order",
                    format!("{kind} listing is not in strict identifier order"),
                );
            }
        }
    }

    /// Empty and whitespace-only searches return nothing for any kind.
    pub fn check_empty_search(&mut self) {
        let engine = self.engine();
        let kinds = [None, Some("paper"), Some("author"), Some("organization")];
        for text in ["", " ", "\t\n"] {
            for kind in kinds {
                self.checks_run += 1;
                let page = engine.search(text, kind, 1, None);
                if page.total != 0 || !page.items.is_empty() {
                    self.violation(
                        "empty_search",
                        format!("search({text:?}, {kind:?}) returned {} results", page.total),
                    );
                }
            }
        }
    }

    /// Searching for an entity's label (in another case) finds the entity.
    pub fn check_search_finds_labels(&mut self, limit: usize) {
        let engine = self.engine();
        let max = i64::try_from(self.settings.max_page_size).unwrap_or(i64::MAX);
        let labelled: Vec<(Arc<str>, Arc<str>)> = self
            .index
            .subjects()
            .iter()
            .filter_map(|id| self.index.label(id).map(|label| (Arc::clone(id), Arc::clone(label))))
            .filter(|(_, label)| !label.trim().is_empty())
            .take(limit)
            .collect();
        for (id, label) in labelled {
            self.checks_run += 1;
            let query = label.to_uppercase();
            let mut found = false;
            let mut page_number = 1;
            loop {
                let page = engine.search(&query, None, page_number, Some(max));
                if page.items.iter().any(|summary| summary.id == id) {
                    found = true;
                    break;
                }
                if !page.has_next() {
                    break;
                }
                page_number += 1;
            }
            if !found {
                self.violation("search_label", format!("search({query:?}) missed {id}"));
            }
        }
    }

    /// Cross-references only ever return identifiers present in the graph.
    pub fn check_cross_reference_closure(&mut self, limit: usize) {
        let engine = self.engine();
        let graph = self.graph;
        let mut known: HashSet<&str> = HashSet::new();
        for statement in graph.statements() {
            known.insert(&statement.subject);
            if let Some(object) = statement.object_resource() {
                known.insert(object);
            }
        }
        let subjects: Vec<Arc<str>> = self.index.subjects().iter().take(limit).cloned().collect();
        for id in subjects {
            for (relation, _) in vocab::RELATION_ALIASES {
                self.checks_run += 1;
                match engine.cross_reference(&id, relation) {
                    Ok(related) => {
                        let unknown: Vec<&str> = related
                            .iter()
                            .map(|summary| &*summary.id)
                            .filter(|related| !known.contains(related))
                            .collect();
                        if !unknown.is_empty() {
                            self.violation(
                                "xref_closure",
                                format!("{id} {relation}: unknown ids {unknown:?}"),
                            );
                        }
                        let distinct: HashSet<&str> = related.iter().map(|summary| &*summary.id).collect();
                        if distinct.len() != related.len() {
                            self.violation("xref_dedup", format!("{id} {relation}: duplicates"));
                        }
                    }
                    Err(e) => {
                        self.violation("xref_subject", format!("{id} {relation}: {e}"));
                    }
                }
            }
        }
    }

    /// Loading and indexing the same document again yields the same index
    /// contents in the same order.
    pub fn check_rebuild_determinism(&mut self, turtle: &str, settings: &IndexSettings) {
        self.checks_run += 1;
        let graph = match parse_graph(turtle) {
            Ok(graph) => graph,
            Err(e) => {
                self.violation("rebuild", format!("document no longer parses: {e}"));
                return;
            }
        };
        let rebuilt = Index::build(&graph, settings);
        let index = self.index;

        if rebuilt.subjects() != index.subjects() {
            self.violation("rebuild", "subject order differs".to_string());
        }
        for sort in [SortKey::Label, SortKey::Identifier] {
            if rebuilt.all_entities(sort) != index.all_entities(sort) {
                self.violation("rebuild", format!("{sort:?} order differs"));
            }
            for kind in EntityKind::LISTABLE {
                if rebuilt.listing(kind, sort) != index.listing(kind, sort) {
                    self.violation("rebuild", format!("{kind} {sort:?} listing differs"));
                }
            }
        }
        if rebuilt.search_entries() != index.search_entries() {
            self.violation("rebuild", "search entries differ".to_string());
        }
        let differing: Vec<&Arc<str>> = index
            .subjects()
            .iter()
            .filter(|id| {
                rebuilt.label(id) != index.label(id)
                    || rebuilt.kind(id) != index.kind(id)
                    || rebuilt.label_rank(id) != index.label_rank(id)
            })
            .collect();
        if !differing.is_empty() {
            self.violation("rebuild", format!("label, kind or rank differs for {differing:?}"));
        }
    }
}
