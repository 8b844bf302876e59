//! Index construction.
//!
//! One pass over the statement arena collects the per-subject, reverse,
//! per-predicate, kind, label and search tables. A single sort of all
//! subjects by label and one by identifier then yield every listing: the
//! per-kind listings are filtered out of the global orders, which keeps
//! them consistent with each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::{Index, IndexSettings, Listing, SearchEntry};
use crate::graph::Graph;
use crate::types::Term;
use crate::vocab::EntityKind;

/// Label candidate: priority of the predicate it came from, then the value.
type LabelCandidate = (usize, Arc<str>);

impl Index {
    /// Build the index for `graph`.
    ///
    /// # Post-conditions
    ///
    /// - `len()` equals the number of distinct subjects in `graph`.
    /// - Building twice from the same graph yields identical orderings.
    #[must_use]
    pub fn build(graph: &Graph, settings: &IndexSettings) -> Self {
        let started = Instant::now();
        let mut builder = IndexBuilder::new(settings);
        for (position, statement) in graph.statements().iter().enumerate() {
            builder.add(position, &statement.subject, &statement.predicate, &statement.object);
        }
        let index = builder.finish();
        tracing::debug!(
            statements = graph.len(),
            subjects = index.len(),
            elapsed = ?started.elapsed(),
            "Built index"
        );
        index
    }
}

struct IndexBuilder<'s> {
    settings: &'s IndexSettings,
    subjects: HashMap<Arc<str>, Vec<usize>>,
    subject_order: Vec<Arc<str>>,
    incoming: HashMap<Arc<str>, Vec<usize>>,
    predicates: HashMap<Arc<str>, Vec<usize>>,
    kinds: HashMap<Arc<str>, EntityKind>,
    labels: HashMap<Arc<str>, LabelCandidate>,
    search_entries: Vec<SearchEntry>,
}

impl<'s> IndexBuilder<'s> {
    fn new(settings: &'s IndexSettings) -> Self {
        Self {
            settings,
            subjects: HashMap::new(),
            subject_order: Vec::new(),
            incoming: HashMap::new(),
            predicates: HashMap::new(),
            kinds: HashMap::new(),
            labels: HashMap::new(),
            search_entries: Vec::new(),
        }
    }

    fn add(&mut self, position: usize, subject: &Arc<str>, predicate: &Arc<str>, object: &Term) {
        match self.subjects.get_mut(subject) {
            Some(positions) => positions.push(position),
            None => {
                self.subjects.insert(Arc::clone(subject), vec![position]);
                self.subject_order.push(Arc::clone(subject));
            }
        }
        self.predicates
            .entry(Arc::clone(predicate))
            .or_default()
            .push(position);

        match object {
            Term::Resource { id } => {
                self.incoming
                    .entry(Arc::clone(id))
                    .or_default()
                    .push(position);
                if **predicate == *self.settings.type_predicate {
                    self.add_type(subject, id);
                }
            }
            Term::Literal(literal) => {
                if let Some(priority) = self
                    .settings
                    .label_predicates
                    .iter()
                    .position(|p| **p == **predicate)
                {
                    self.add_label(subject, priority, &literal.lexical);
                }
                if self
                    .settings
                    .search_predicates
                    .iter()
                    .any(|p| **p == **predicate)
                {
                    self.search_entries.push(SearchEntry {
                        subject: Arc::clone(subject),
                        text: literal.lexical.to_lowercase(),
                    });
                }
            }
        }
    }

    /// The first recognized type wins; later ones are ignored.
    fn add_type(&mut self, subject: &Arc<str>, type_iri: &str) {
        if self.kinds.contains_key(subject) {
            return;
        }
        if let Some(kind) = EntityKind::from_type_iri(type_iri) {
            self.kinds.insert(Arc::clone(subject), kind);
        }
    }

    /// Keep the value from the highest priority predicate, first seen on ties.
    fn add_label(&mut self, subject: &Arc<str>, priority: usize, value: &Arc<str>) {
        if value.trim().is_empty() {
            return;
        }
        match self.labels.get(subject) {
            Some((existing, _)) if *existing <= priority => {}
            _ => {
                self.labels
                    .insert(Arc::clone(subject), (priority, Arc::clone(value)));
            }
        }
    }

    fn finish(self) -> Index {
        let labels: HashMap<Arc<str>, Arc<str>> = self
            .labels
            .into_iter()
            .map(|(subject, (_, label))| (subject, label))
            .collect();

        let mut kinds = self.kinds;
        for subject in &self.subject_order {
            kinds
                .entry(Arc::clone(subject))
                .or_insert(EntityKind::Untyped);
        }

        let mut by_label: Vec<(String, Arc<str>)> = self
            .subject_order
            .iter()
            .map(|subject| {
                let key = labels.get(subject).unwrap_or(subject).to_lowercase();
                (key, Arc::clone(subject))
            })
            .collect();
        by_label.sort_unstable();
        let by_label: Vec<Arc<str>> = by_label.into_iter().map(|(_, subject)| subject).collect();

        let mut by_identifier = self.subject_order.clone();
        by_identifier.sort_unstable();

        let label_ranks = by_label
            .iter()
            .enumerate()
            .map(|(rank, subject)| (Arc::clone(subject), rank))
            .collect();

        let mut by_kind: HashMap<EntityKind, Listing> = HashMap::new();
        for subject in &by_label {
            if let Some(kind) = kinds.get(subject) {
                by_kind
                    .entry(*kind)
                    .or_default()
                    .by_label
                    .push(Arc::clone(subject));
            }
        }
        for subject in &by_identifier {
            if let Some(kind) = kinds.get(subject) {
                by_kind
                    .entry(*kind)
                    .or_default()
                    .by_identifier
                    .push(Arc::clone(subject));
            }
        }

        Index {
            type_predicate: Arc::from(self.settings.type_predicate.as_str()),
            subjects: self.subjects,
            subject_order: self.subject_order,
            incoming: self.incoming,
            predicates: self.predicates,
            kinds,
            labels,
            label_ranks,
            all: Listing {
                by_label,
                by_identifier,
            },
            by_kind,
            search_entries: self.search_entries,
        }
    }
}
