//! Query engine implementation.
//!
//! `QueryEngine` answers reads against one graph and the index built from
//! it. Every operation is a pure read; results are owned records that do
//! not borrow from the graph.

use std::collections::HashSet;
use std::sync::Arc;

use super::types::{
    AuthorRow, EntityRecord, EntitySummary, Page, PaperDetail, PaperRow, QuerySettings, Statistics,
};
use super::{QueryError, SortKey};
use crate::entity::{AuthorView, OrganizationView, PaperView, PropertyMap};
use crate::graph::Graph;
use crate::index::Index;
use crate::types::Statement;
use crate::vocab::{self, EntityKind};

/// The query engine evaluates reads against a graph and its index.
pub struct QueryEngine<'a> {
    graph: &'a Graph,
    index: &'a Index,
    settings: &'a QuerySettings,
}

impl<'a> QueryEngine<'a> {
    /// Create a query engine.
    ///
    /// # Pre-conditions
    ///
    /// - `index` was built from `graph`.
    #[must_use]
    pub const fn new(graph: &'a Graph, index: &'a Index, settings: &'a QuerySettings) -> Self {
        Self {
            graph,
            index,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &'a QuerySettings {
        self.settings
    }

    /// Every statement whose subject is `id`, in document order.
    pub fn get_by_id(&self, id: &str) -> Result<EntityRecord, QueryError> {
        let id = require_identifier(id)?;
        tracing::debug!(id, "get_by_id");
        let positions = self
            .index
            .subject_positions(id)
            .ok_or_else(|| QueryError::NotFound(id.to_owned()))?;
        let statements: Vec<Statement> = positions
            .iter()
            .filter_map(|position| self.graph.get(*position))
            .cloned()
            .collect();
        Ok(EntityRecord {
            id: self.graph_id(id).map_or_else(|| Arc::from(id), Arc::clone),
            kind: self.index.kind(id).unwrap_or(EntityKind::Untyped),
            label: self.index.label(id).cloned(),
            statements,
        })
    }

    /// One page of the entities of type `kind`.
    ///
    /// `kind` is a kind name (`paper`, `authors`, ...) or a type IRI. An
    /// unknown kind yields an empty page.
    #[must_use]
    pub fn list_by_type(
        &self,
        kind: &str,
        page: i64,
        page_size: Option<i64>,
        sort: Option<SortKey>,
    ) -> Page<EntitySummary> {
        let (page, page_size) = self.settings.normalize(page, page_size);
        tracing::debug!(kind, page, page_size, "list_by_type");
        let Some(kind) = EntityKind::parse(kind) else {
            return Page::empty(page, page_size);
        };
        let ids = self.index.listing(kind, sort.unwrap_or_default());
        Page::from_slice(ids, page, page_size, |id| self.summary(id))
    }

    /// Entities with a searchable literal containing `text`, ignoring case.
    ///
    /// With the `paper` filter, papers whose author or creator label
    /// contains `text` match too, once each. Blank or empty `text` matches
    /// nothing. Results are in label order.
    #[must_use]
    pub fn search(
        &self,
        text: &str,
        kind: Option<&str>,
        page: i64,
        page_size: Option<i64>,
    ) -> Page<EntitySummary> {
        let (page, page_size) = self.settings.normalize(page, page_size);
        let needle = text.trim().to_lowercase();
        tracing::debug!(text = needle.as_str(), ?kind, page, page_size, "search");
        if needle.is_empty() {
            return Page::empty(page, page_size);
        }
        let kind = match kind.map(EntityKind::parse) {
            None => None,
            Some(Some(kind)) => Some(kind),
            Some(None) => return Page::empty(page, page_size),
        };

        let mut seen: HashSet<&str> = HashSet::new();
        let mut matches: Vec<&Arc<str>> = self
            .index
            .search_entries()
            .iter()
            .filter(|entry| entry.text.contains(&needle))
            .map(|entry| &entry.subject)
            .filter(|subject| kind.is_none_or(|kind| self.index.kind(subject) == Some(kind)))
            .filter(|subject| seen.insert(subject))
            .collect();
        if kind == Some(EntityKind::Paper) {
            for paper in self.index.listing(EntityKind::Paper, SortKey::Label) {
                if !seen.contains(&**paper) && self.has_author_matching(paper, &needle) {
                    seen.insert(paper);
                    matches.push(paper);
                }
            }
        }
        self.sort_by_label(&mut matches);
        Page::from_slice(&matches, page, page_size, |id| self.summary(id))
    }

    /// Entities linked to `id` through `relation`, in either direction.
    ///
    /// `relation` is an alias such as `authoredBy`, a `prefix:local` name
    /// or a predicate IRI. Outgoing objects come first, then incoming
    /// subjects, each in statement order, without duplicates.
    pub fn cross_reference(&self, id: &str, relation: &str) -> Result<Vec<EntitySummary>, QueryError> {
        let id = require_identifier(id)?;
        let relation = relation.trim();
        if relation.is_empty() {
            return Err(QueryError::InvalidArgument(
                "relation must not be empty".to_owned(),
            ));
        }
        tracing::debug!(id, relation, "cross_reference");
        if !self.index.contains(id) {
            return Err(QueryError::NotFound(id.to_owned()));
        }
        let predicates = vocab::expand_relation(relation);
        let matches = |statement: &Statement| {
            predicates
                .iter()
                .any(|predicate| **predicate == *statement.predicate)
        };

        let mut seen: HashSet<&str> = HashSet::new();
        let mut related: Vec<&Arc<str>> = Vec::new();
        for statement in self.statements_of(id) {
            if let Some(object) = statement.object_resource() {
                if matches(statement) && seen.insert(object) {
                    related.push(object);
                }
            }
        }
        for statement in self.incoming_to(id) {
            if matches(statement) && seen.insert(&statement.subject) {
                related.push(&statement.subject);
            }
        }
        Ok(related.into_iter().map(|id| self.summary(id)).collect())
    }

    /// Entity counts per kind and the number of statements.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        Statistics {
            papers: self.index.count(EntityKind::Paper),
            authors: self.index.count(EntityKind::Author),
            organizations: self.index.count(EntityKind::Organization),
            journals: self.index.count(EntityKind::Journal),
            keywords: self.index.count(EntityKind::Keyword),
            untyped: self.index.count(EntityKind::Untyped),
            entities: self.index.len(),
            triples: self.graph.len(),
        }
    }

    /// Whether `id` is the subject of at least one statement.
    #[must_use]
    pub fn resource_exists(&self, id: &str) -> bool {
        self.index.contains_subject(id.trim())
    }

    /// Authors sharing at least one paper with `author`, in label order.
    pub fn coauthors(&self, author: &str) -> Result<Vec<EntitySummary>, QueryError> {
        let author = self.require_known(author)?;
        let mut seen: HashSet<&str> = HashSet::from([&**author]);
        let mut coauthors: Vec<&Arc<str>> = Vec::new();
        for paper in self.authored_papers(author) {
            for other in self.paper(paper).authors() {
                if seen.insert(other) {
                    coauthors.push(other);
                }
            }
        }
        self.sort_by_label(&mut coauthors);
        Ok(coauthors.into_iter().map(|id| self.summary(id)).collect())
    }

    /// Papers naming `author` as author or creator, in label order.
    pub fn papers_by_author(&self, author: &str) -> Result<Vec<PaperRow>, QueryError> {
        let author = self.require_known(author)?;
        let mut papers = self.authored_papers(author);
        self.sort_by_label(&mut papers);
        Ok(papers.into_iter().map(|id| self.paper_row(id)).collect())
    }

    /// Members of `organization`: those it lists as members and those
    /// naming it as their affiliation, in label order.
    pub fn organization_members(&self, organization: &str) -> Result<Vec<EntitySummary>, QueryError> {
        let organization = self.require_known(organization)?;
        let view = OrganizationView::new(self.properties(organization));
        let mut seen: HashSet<&str> = HashSet::new();
        let mut members: Vec<&Arc<str>> = Vec::new();
        for member in view.members() {
            if seen.insert(member) {
                members.push(member);
            }
        }
        for statement in self.incoming_to(organization) {
            if *statement.predicate == *vocab::SCHEMA_AFFILIATION && seen.insert(&statement.subject) {
                members.push(&statement.subject);
            }
        }
        self.sort_by_label(&mut members);
        Ok(members.into_iter().map(|id| self.summary(id)).collect())
    }

    /// One page of the papers published in `year`, in label order.
    #[must_use]
    pub fn papers_by_year(&self, year: i32, page: i64, page_size: Option<i64>) -> Page<PaperRow> {
        let (page, page_size) = self.settings.normalize(page, page_size);
        tracing::debug!(year, page, page_size, "papers_by_year");
        let papers: Vec<&Arc<str>> = self
            .index
            .listing(EntityKind::Paper, SortKey::Label)
            .iter()
            .filter(|id| self.paper(*id).year() == Some(year))
            .collect();
        Page::from_slice(&papers, page, page_size, |id| self.paper_row(*id))
    }

    /// One page of paper rows: title, first author and year.
    #[must_use]
    pub fn paper_rows(&self, page: i64, page_size: Option<i64>, sort: Option<SortKey>) -> Page<PaperRow> {
        let (page, page_size) = self.settings.normalize(page, page_size);
        let ids = self
            .index
            .listing(EntityKind::Paper, sort.unwrap_or_default());
        Page::from_slice(ids, page, page_size, |id| self.paper_row(id))
    }

    /// One page of authors with their first affiliation.
    #[must_use]
    pub fn author_rows(
        &self,
        page: i64,
        page_size: Option<i64>,
        sort: Option<SortKey>,
    ) -> Page<AuthorRow> {
        let (page, page_size) = self.settings.normalize(page, page_size);
        let ids = self
            .index
            .listing(EntityKind::Author, sort.unwrap_or_default());
        Page::from_slice(ids, page, page_size, |id| {
            let author = AuthorView::new(self.properties(id));
            AuthorRow {
                author: self.summary(id),
                name: author.name().map(str::to_owned),
                affiliation: author
                    .affiliations()
                    .first()
                    .map(|organization| self.summary(organization)),
            }
        })
    }

    /// Title, authors, year, journal, keywords and abstract of a paper.
    pub fn paper_detail(&self, id: &str) -> Result<PaperDetail, QueryError> {
        let id = self.require_known(id)?;
        if self.index.kind(id) != Some(EntityKind::Paper) {
            return Err(QueryError::NotFound(id.to_string()));
        }
        let paper = self.paper(id);
        Ok(PaperDetail {
            id: Arc::clone(id),
            title: paper.title().map(str::to_owned),
            authors: paper.authors().into_iter().map(|author| self.summary(author)).collect(),
            year: paper.year(),
            journal: paper.journal().map(|journal| self.summary(journal)),
            keywords: paper.keywords().into_iter().map(|keyword| self.summary(keyword)).collect(),
            abstract_text: paper.abstract_text().map(str::to_owned),
        })
    }

    /// The display summary of any identifier in the graph.
    #[must_use]
    pub fn summary(&self, id: &Arc<str>) -> EntitySummary {
        EntitySummary {
            id: Arc::clone(id),
            label: self.index.label(id).cloned(),
            kind: self.index.kind(id),
        }
    }

    fn paper_row(&self, id: &'a Arc<str>) -> PaperRow {
        let paper = self.paper(id);
        PaperRow {
            id: Arc::clone(id),
            title: paper.title().map(str::to_owned),
            author: paper.authors().first().map(|author| self.summary(author)),
            year: paper.year(),
        }
    }

    fn paper(&self, id: &'a str) -> PaperView<'a> {
        PaperView::new(self.properties(id))
    }

    fn properties(&self, id: &'a str) -> PropertyMap<'a> {
        PropertyMap::from_statements(id, self.statements_of(id))
    }

    /// Statements with `id` as subject.
    fn statements_of(&self, id: &str) -> impl Iterator<Item = &'a Statement> + use<'a> {
        let graph = self.graph;
        self.index
            .subject_positions(id)
            .unwrap_or_default()
            .iter()
            .filter_map(move |position| graph.get(*position))
    }

    /// Statements with the resource `id` as object.
    fn incoming_to(&self, id: &str) -> impl Iterator<Item = &'a Statement> + use<'a> {
        let graph = self.graph;
        self.index
            .incoming_positions(id)
            .iter()
            .filter_map(move |position| graph.get(*position))
    }

    /// Papers pointing at `author` through an authorship predicate, in
    /// statement order.
    fn authored_papers(&self, author: &str) -> Vec<&'a Arc<str>> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.incoming_to(author)
            .filter(|statement| {
                vocab::AUTHORSHIP_PREDICATES
                    .iter()
                    .any(|predicate| **predicate == *statement.predicate)
            })
            .map(|statement| &statement.subject)
            .filter(|paper| seen.insert(paper))
            .collect()
    }

    /// Whether an author or creator of `paper` has a label containing the
    /// lowercase `needle`.
    fn has_author_matching(&self, paper: &'a str, needle: &str) -> bool {
        self.paper(paper).authors().into_iter().any(|author| {
            self.index
                .label(author)
                .is_some_and(|label| label.to_lowercase().contains(needle))
        })
    }

    /// Order by label rank; identifiers with no rank (object-only
    /// resources) go last, by identifier.
    fn sort_by_label(&self, ids: &mut [&Arc<str>]) {
        ids.sort_by(|a, b| {
            let rank_a = self.index.label_rank(a).unwrap_or(usize::MAX);
            let rank_b = self.index.label_rank(b).unwrap_or(usize::MAX);
            rank_a.cmp(&rank_b).then_with(|| a.cmp(b))
        });
    }

    /// The graph's own copy of `id`, if it appears anywhere in the graph.
    fn graph_id(&self, id: &str) -> Option<&'a Arc<str>> {
        self.statements_of(id)
            .next()
            .map(|statement| &statement.subject)
            .or_else(|| {
                self.incoming_to(id)
                    .next()
                    .and_then(Statement::object_resource)
            })
    }

    /// Trim `id` and look it up in the graph.
    fn require_known(&self, id: &str) -> Result<&'a Arc<str>, QueryError> {
        let id = require_identifier(id)?;
        self.graph_id(id)
            .ok_or_else(|| QueryError::NotFound(id.to_owned()))
    }
}

fn require_identifier(id: &str) -> Result<&str, QueryError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(QueryError::InvalidArgument(
            "identifier must not be empty".to_owned(),
        ));
    }
    Ok(id)
}
