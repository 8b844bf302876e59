//! Typed access to an entity's properties.
//!
//! A `PropertyMap` groups one subject's statements by predicate, keeping
//! first-seen order, with each predicate holding one or many values. The
//! `PaperView`, `AuthorView` and `OrganizationView` wrappers put named
//! accessors over it for the entity kinds the application knows about.

use std::sync::Arc;

use crate::types::{Literal, Statement, Term};
use crate::vocab;

/// The value(s) of one predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values<'g> {
    One(&'g Term),
    Many(Vec<&'g Term>),
}

impl<'g> Values<'g> {
    fn push(&mut self, term: &'g Term) {
        match self {
            Self::One(first) => *self = Self::Many(vec![*first, term]),
            Self::Many(terms) => terms.push(term),
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&'g Term> {
        match self {
            Self::One(term) => Some(*term),
            Self::Many(terms) => terms.first().copied(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(terms) => terms.len(),
        }
    }

    /// Always false; a predicate is only present with at least one value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &'g Term> + '_ {
        let slice: &[&'g Term] = match self {
            Self::One(term) => std::slice::from_ref(term),
            Self::Many(terms) => terms,
        };
        slice.iter().copied()
    }
}

/// One subject's statements as predicate -> values, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMap<'g> {
    id: &'g str,
    entries: Vec<(&'g str, Values<'g>)>,
}

impl<'g> PropertyMap<'g> {
    /// Collect the statements of `id`. Statements about other subjects are
    /// skipped.
    pub fn from_statements(id: &'g str, statements: impl IntoIterator<Item = &'g Statement>) -> Self {
        let mut entries: Vec<(&'g str, Values<'g>)> = Vec::new();
        for statement in statements {
            if &*statement.subject != id {
                continue;
            }
            let predicate: &'g str = &statement.predicate;
            match entries.iter_mut().find(|(p, _)| *p == predicate) {
                Some((_, values)) => values.push(&statement.object),
                None => entries.push((predicate, Values::One(&statement.object))),
            }
        }
        Self { id, entries }
    }

    #[must_use]
    pub const fn id(&self) -> &'g str {
        self.id
    }

    #[must_use]
    pub fn get(&self, predicate: &str) -> Option<&Values<'g>> {
        self.entries
            .iter()
            .find(|(p, _)| *p == predicate)
            .map(|(_, values)| values)
    }

    /// Predicates and their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'g str, &Values<'g>)> {
        self.entries.iter().map(|(p, values)| (*p, values))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first literal under the first of `predicates` that has one.
    #[must_use]
    pub fn first_literal(&self, predicates: &[&str]) -> Option<&'g Literal> {
        predicates.iter().find_map(|predicate| {
            self.get(predicate)?
                .iter()
                .find_map(Term::as_literal)
        })
    }

    /// Every resource object under any of `predicates`, deduplicated, in
    /// predicate order then statement order.
    #[must_use]
    pub fn resources(&self, predicates: &[&str]) -> Vec<&'g Arc<str>> {
        let mut found: Vec<&'g Arc<str>> = Vec::new();
        for predicate in predicates {
            let Some(values) = self.get(predicate) else {
                continue;
            };
            for id in values.iter().filter_map(Term::as_resource) {
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }
        found
    }

    /// Every type IRI under `type_predicate`.
    #[must_use]
    pub fn types(&self, type_predicate: &str) -> Vec<&'g Arc<str>> {
        self.resources(&[type_predicate])
    }
}

const PAPER_TITLE: &[&str] = &[vocab::SCHEMA_NAME, vocab::DCTERMS_TITLE];
const PERSON_NAME: &[&str] = &[vocab::FOAF_NAME, vocab::SCHEMA_NAME];

/// A paper: title, authors, year, venue, keywords.
#[derive(Debug, Clone)]
pub struct PaperView<'g>(PropertyMap<'g>);

impl<'g> PaperView<'g> {
    #[must_use]
    pub const fn new(properties: PropertyMap<'g>) -> Self {
        Self(properties)
    }

    #[must_use]
    pub const fn properties(&self) -> &PropertyMap<'g> {
        &self.0
    }

    #[must_use]
    pub fn title(&self) -> Option<&'g str> {
        self.0.first_literal(PAPER_TITLE).map(Literal::as_str)
    }

    /// Authors in the order they were written.
    #[must_use]
    pub fn authors(&self) -> Vec<&'g Arc<str>> {
        self.0.resources(vocab::AUTHORSHIP_PREDICATES)
    }

    /// The first year-bearing literal under the publication date predicates.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        vocab::YEAR_PREDICATES.iter().find_map(|predicate| {
            self.0
                .get(predicate)?
                .iter()
                .filter_map(Term::as_literal)
                .find_map(Literal::year)
        })
    }

    #[must_use]
    pub fn journal(&self) -> Option<&'g Arc<str>> {
        self.0
            .resources(&[vocab::SCHEMA_IS_PART_OF, vocab::DCTERMS_SOURCE])
            .first()
            .copied()
    }

    #[must_use]
    pub fn keywords(&self) -> Vec<&'g Arc<str>> {
        self.0
            .resources(&[vocab::SCHEMA_KEYWORDS, vocab::SCHEMA_ABOUT])
    }

    #[must_use]
    pub fn abstract_text(&self) -> Option<&'g str> {
        self.0
            .first_literal(&[vocab::SCHEMA_DESCRIPTION, vocab::DCTERMS_ABSTRACT])
            .map(Literal::as_str)
    }
}

/// An author: name and affiliations.
#[derive(Debug, Clone)]
pub struct AuthorView<'g>(PropertyMap<'g>);

impl<'g> AuthorView<'g> {
    #[must_use]
    pub const fn new(properties: PropertyMap<'g>) -> Self {
        Self(properties)
    }

    #[must_use]
    pub const fn properties(&self) -> &PropertyMap<'g> {
        &self.0
    }

    #[must_use]
    pub fn name(&self) -> Option<&'g str> {
        self.0.first_literal(PERSON_NAME).map(Literal::as_str)
    }

    #[must_use]
    pub fn affiliations(&self) -> Vec<&'g Arc<str>> {
        self.0.resources(&[vocab::SCHEMA_AFFILIATION])
    }
}

/// An organization: its listed members.
#[derive(Debug, Clone)]
pub struct OrganizationView<'g>(PropertyMap<'g>);

impl<'g> OrganizationView<'g> {
    #[must_use]
    pub const fn new(properties: PropertyMap<'g>) -> Self {
        Self(properties)
    }

    #[must_use]
    pub const fn properties(&self) -> &PropertyMap<'g> {
        &self.0
    }

    /// Members listed on the organization itself.
    #[must_use]
    pub fn members(&self) -> Vec<&'g Arc<str>> {
        self.0.resources(&[vocab::SCHEMA_MEMBER])
    }
}
