//! Resource resolution: from an identifier to a displayable record.
//!
//! A resolved record groups the entity's outgoing statements by predicate,
//! labels every referenced resource one level deep, and lists "what links
//! here" grouped by predicate with a per-predicate cap.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::entity::PropertyMap;
use crate::graph::Graph;
use crate::index::Index;
use crate::query::{EntitySummary, QueryError};
use crate::turtle::{write_jsonld, write_turtle};
use crate::types::{BLANK_NODE_PREFIX, Literal, Statement, Term};
use crate::vocab::{self, EntityKind};

/// An entity ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
    pub id: Arc<str>,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Arc<str>>,
    /// Objects of the type predicate, in statement order.
    pub types: Vec<Arc<str>>,
    /// Outgoing statements grouped by predicate, in first-seen order.
    pub properties: Vec<PropertyGroup>,
    /// Incoming statements grouped by predicate, in first-seen order.
    pub incoming: Vec<IncomingGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyGroup {
    pub predicate: Arc<str>,
    /// `prefix:local` form of the predicate when a known prefix applies.
    pub predicate_label: String,
    pub values: Vec<ResolvedValue>,
}

/// An object value with the label of the resource it names, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedValue {
    Resource(EntitySummary),
    Literal(Literal),
}

/// Subjects pointing at the resolved entity through one predicate.
///
/// # Invariants
///
/// - `subjects.len() == min(total, incoming_limit)`.
/// - `truncated` is true exactly when `total > subjects.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingGroup {
    pub predicate: Arc<str>,
    pub predicate_label: String,
    /// Number of incoming statements, before the cap.
    pub total: usize,
    pub subjects: Vec<EntitySummary>,
    pub truncated: bool,
}

/// Resolves identifiers against one graph and its index.
pub struct Resolver<'a> {
    graph: &'a Graph,
    index: &'a Index,
    incoming_limit: usize,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub const fn new(graph: &'a Graph, index: &'a Index, incoming_limit: usize) -> Self {
        Self {
            graph,
            index,
            incoming_limit,
        }
    }

    /// Map an external identifier to the entity identifier it names.
    ///
    /// Accepts a full IRI, a blank node (`_:label`) or a `prefix:local`
    /// name under a well-known prefix. Returns `None` if the result is not
    /// an entity in the index.
    #[must_use]
    pub fn canonical_id(&self, external: &str) -> Option<&'a Arc<str>> {
        let external = external.trim();
        if external.is_empty() {
            return None;
        }
        let candidate = external
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(external);
        self.entity_id(candidate).or_else(|| {
            if candidate.starts_with(BLANK_NODE_PREFIX) {
                return None;
            }
            vocab::expand_curie(candidate).and_then(|iri| self.entity_id(&iri))
        })
    }

    /// Resolve an entity into its display record.
    pub fn resolve(&self, id: &str) -> Result<ResolvedResource, QueryError> {
        let id = self.require_entity(id)?;
        tracing::debug!(id = &**id, "resolve");
        let properties = PropertyMap::from_statements(id, self.statements_of(id));

        let types = properties
            .types(self.index.type_predicate())
            .into_iter()
            .cloned()
            .collect();

        let groups = properties
            .iter()
            .map(|(predicate, values)| PropertyGroup {
                predicate: self.shared_predicate(predicate),
                predicate_label: vocab::compact_iri(predicate),
                values: values.iter().map(|term| self.resolve_value(term)).collect(),
            })
            .collect();

        Ok(ResolvedResource {
            id: Arc::clone(id),
            kind: self.index.kind(id).unwrap_or(EntityKind::Untyped),
            label: self.index.label(id).cloned(),
            types,
            properties: groups,
            incoming: self.incoming_groups(id),
        })
    }

    /// The entity's own statements as a Turtle document.
    pub fn to_turtle(&self, id: &str) -> Result<String, QueryError> {
        let id = self.require_entity(id)?;
        Ok(write_turtle(self.statements_of(id)))
    }

    /// The entity's own statements as a JSON-LD document.
    pub fn to_jsonld(&self, id: &str) -> Result<Value, QueryError> {
        let id = self.require_entity(id)?;
        Ok(write_jsonld(self.statements_of(id)))
    }

    fn resolve_value(&self, term: &Term) -> ResolvedValue {
        match term {
            Term::Resource { id } => ResolvedValue::Resource(EntitySummary {
                id: Arc::clone(id),
                label: self.index.label(id).cloned(),
                kind: self.index.kind(id),
            }),
            Term::Literal(literal) => ResolvedValue::Literal(literal.clone()),
        }
    }

    fn incoming_groups(&self, id: &str) -> Vec<IncomingGroup> {
        let mut groups: Vec<IncomingGroup> = Vec::new();
        for position in self.index.incoming_positions(id) {
            let Some(statement) = self.graph.get(*position) else {
                continue;
            };
            let group = if let Some(existing) = groups
                .iter_mut()
                .position(|group| group.predicate == statement.predicate)
            {
                &mut groups[existing]
            } else {
                groups.push(IncomingGroup {
                    predicate: Arc::clone(&statement.predicate),
                    predicate_label: vocab::compact_iri(&statement.predicate),
                    total: 0,
                    subjects: Vec::new(),
                    truncated: false,
                });
                let last = groups.len() - 1;
                &mut groups[last]
            };
            group.total += 1;
            if group.subjects.len() < self.incoming_limit {
                group.subjects.push(EntitySummary {
                    id: Arc::clone(&statement.subject),
                    label: self.index.label(&statement.subject).cloned(),
                    kind: self.index.kind(&statement.subject),
                });
            } else {
                group.truncated = true;
            }
        }
        groups
    }

    fn statements_of(&self, id: &str) -> impl Iterator<Item = &'a Statement> + use<'a> {
        let graph = self.graph;
        self.index
            .subject_positions(id)
            .unwrap_or_default()
            .iter()
            .filter_map(move |position| graph.get(*position))
    }

    /// The graph's copy of a subject identifier.
    fn entity_id(&self, id: &str) -> Option<&'a Arc<str>> {
        self.statements_of(id).next().map(|statement| &statement.subject)
    }

    fn require_entity(&self, id: &str) -> Result<&'a Arc<str>, QueryError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidArgument(
                "identifier must not be empty".to_owned(),
            ));
        }
        self.entity_id(trimmed)
            .ok_or_else(|| QueryError::NotFound(trimmed.to_owned()))
    }

    fn shared_predicate(&self, predicate: &str) -> Arc<str> {
        self.index
            .predicate_positions(predicate)
            .first()
            .and_then(|position| self.graph.get(*position))
            .map_or_else(|| Arc::from(predicate), |s| Arc::clone(&s.predicate))
    }
}

/// Build the IRI for a `/research/{entity_type}/{entity_id}` path.
///
/// Papers live directly under the base as `paper_{id}`; everything else is
/// `{base}{entity_type}/{id}`.
#[must_use]
pub fn resource_iri(base: &str, entity_type: &str, entity_id: &str) -> String {
    if entity_type == "paper" {
        format!("{base}paper_{entity_id}")
    } else {
        format!("{base}{entity_type}/{entity_id}")
    }
}
