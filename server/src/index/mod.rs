//! Lookup structures over a loaded `Graph`.
//!
//! The index is rebuilt wholesale from a graph (see `builder`) and never
//! updated in place. It refers to statements by their position in the graph
//! arena, so an `Index` is only meaningful next to the `Graph` it was built
//! from.
//!
//! # Invariants
//!
//! - Every subject in the graph has exactly one entry in `subjects` and one
//!   entry in each ordering; nothing else is indexed as an entity.
//! - All orderings are total and deterministic: label order ties break on
//!   the identifier, identifier order is plain string order.

mod builder;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::vocab::{self, EntityKind};

/// Which predicates the index treats as special.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// The predicate whose object names an entity's type.
    pub type_predicate: String,
    /// Predicates that carry a human-readable label, highest priority first.
    pub label_predicates: Vec<String>,
    /// Predicates whose literal values are matched by text search.
    pub search_predicates: Vec<String>,
}

impl IndexSettings {
    /// The label predicates used when none are configured.
    pub const DEFAULT_LABEL_PREDICATES: [&str; 4] = [
        vocab::SCHEMA_NAME,
        vocab::FOAF_NAME,
        vocab::DCTERMS_TITLE,
        vocab::RDFS_LABEL,
    ];
}

impl Default for IndexSettings {
    fn default() -> Self {
        let labels: Vec<String> = Self::DEFAULT_LABEL_PREDICATES
            .iter()
            .map(|p| (*p).to_owned())
            .collect();
        Self {
            type_predicate: vocab::RDF_TYPE.to_owned(),
            search_predicates: labels.clone(),
            label_predicates: labels,
        }
    }
}

/// Ordering for entity listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Case-insensitive label, ties broken by identifier.
    #[default]
    Label,
    /// Identifier string order.
    Identifier,
}

impl SortKey {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "label" | "name" | "title" => Some(Self::Label),
            "identifier" | "id" | "iri" => Some(Self::Identifier),
            _ => None,
        }
    }
}

/// One searchable literal: the subject it belongs to and its lowercased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub subject: Arc<str>,
    pub text: String,
}

/// Entities of one kind in both supported orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Listing {
    by_label: Vec<Arc<str>>,
    by_identifier: Vec<Arc<str>>,
}

impl Listing {
    fn get(&self, sort: SortKey) -> &[Arc<str>] {
        match sort {
            SortKey::Label => &self.by_label,
            SortKey::Identifier => &self.by_identifier,
        }
    }
}

/// The derived lookup structures for one graph.
#[derive(Debug, Default)]
pub struct Index {
    type_predicate: Arc<str>,
    /// subject -> positions of its statements, in document order
    subjects: HashMap<Arc<str>, Vec<usize>>,
    /// Subjects in first-seen order.
    subject_order: Vec<Arc<str>>,
    /// object resource -> positions of statements pointing at it
    incoming: HashMap<Arc<str>, Vec<usize>>,
    /// predicate -> positions of its statements
    predicates: HashMap<Arc<str>, Vec<usize>>,
    kinds: HashMap<Arc<str>, EntityKind>,
    labels: HashMap<Arc<str>, Arc<str>>,
    /// subject -> position in the global label order
    label_ranks: HashMap<Arc<str>, usize>,
    all: Listing,
    by_kind: HashMap<EntityKind, Listing>,
    search_entries: Vec<SearchEntry>,
}

impl Index {
    /// Number of indexed entities, which is the number of distinct subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subject_order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject_order.is_empty()
    }

    #[must_use]
    pub fn type_predicate(&self) -> &str {
        &self.type_predicate
    }

    /// Subjects in the order they first appear in the graph.
    #[must_use]
    pub fn subjects(&self) -> &[Arc<str>] {
        &self.subject_order
    }

    #[must_use]
    pub fn contains_subject(&self, id: &str) -> bool {
        self.subjects.contains_key(id)
    }

    /// Whether `id` appears anywhere in the graph as a subject or as an
    /// object resource.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.subjects.contains_key(id) || self.incoming.contains_key(id)
    }

    /// Positions of the statements whose subject is `id`.
    #[must_use]
    pub fn subject_positions(&self, id: &str) -> Option<&[usize]> {
        self.subjects.get(id).map(Vec::as_slice)
    }

    /// Positions of the statements whose object is the resource `id`.
    #[must_use]
    pub fn incoming_positions(&self, id: &str) -> &[usize] {
        self.incoming.get(id).map_or(&[], Vec::as_slice)
    }

    /// Positions of the statements using `predicate`.
    #[must_use]
    pub fn predicate_positions(&self, predicate: &str) -> &[usize] {
        self.predicates.get(predicate).map_or(&[], Vec::as_slice)
    }

    /// The kind of a subject. `None` if `id` is not a subject.
    #[must_use]
    pub fn kind(&self, id: &str) -> Option<EntityKind> {
        self.kinds.get(id).copied()
    }

    /// The label chosen for `id`, if any label predicate applies.
    #[must_use]
    pub fn label(&self, id: &str) -> Option<&Arc<str>> {
        self.labels.get(id)
    }

    /// Position of `id` in the global label order.
    #[must_use]
    pub fn label_rank(&self, id: &str) -> Option<usize> {
        self.label_ranks.get(id).copied()
    }

    /// Every entity of `kind` in the requested order.
    ///
    /// `Untyped` entities are never listed; the result is empty for them.
    #[must_use]
    pub fn listing(&self, kind: EntityKind, sort: SortKey) -> &[Arc<str>] {
        if kind == EntityKind::Untyped {
            return &[];
        }
        self.by_kind.get(&kind).map_or(&[], |listing| listing.get(sort))
    }

    /// Every entity, regardless of kind, in the requested order.
    #[must_use]
    pub fn all_entities(&self, sort: SortKey) -> &[Arc<str>] {
        self.all.get(sort)
    }

    /// Number of subjects of `kind`, including `Untyped`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.by_kind
            .get(&kind)
            .map_or(0, |listing| listing.by_label.len())
    }

    #[must_use]
    pub fn search_entries(&self) -> &[SearchEntry] {
        &self.search_entries
    }
}
