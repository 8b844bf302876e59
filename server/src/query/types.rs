//! Records returned by the query engine.
//!
//! Everything here is plain data with `Serialize`, so any front end can
//! render it without depending on the graph or index.

use std::sync::Arc;

use serde::Serialize;

use crate::types::Statement;
use crate::vocab::EntityKind;

/// Page size limits and the incoming-reference cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Most incoming references surfaced per predicate by the resolver.
    pub incoming_limit: usize,
}

impl QuerySettings {
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const MAX_PAGE_SIZE: usize = 100;
    pub const INCOMING_LIMIT: usize = 50;

    /// Clamp a requested page and page size into range.
    ///
    /// Pages start at 1. A missing page size means the default; any size is
    /// clamped to `1..=max_page_size`.
    #[must_use]
    pub fn normalize(&self, page: i64, page_size: Option<i64>) -> (usize, usize) {
        let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
        let max = self.max_page_size.max(1);
        let page_size = page_size.map_or(self.default_page_size, |size| {
            usize::try_from(size.max(1)).unwrap_or(max)
        });
        (page, page_size.clamp(1, max))
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_page_size: Self::DEFAULT_PAGE_SIZE,
            max_page_size: Self::MAX_PAGE_SIZE,
            incoming_limit: Self::INCOMING_LIMIT,
        }
    }
}

/// One page of results plus the size of the full result set.
///
/// # Invariants
///
/// - `items.len() <= page_size`.
/// - A page past the end has no items but still reports `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// An empty result set.
    #[must_use]
    pub const fn empty(page: usize, page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page,
            page_size,
            total_pages: 0,
        }
    }

    /// Cut page `page` out of `all`, converting only the items kept.
    pub fn from_slice<'s, S>(
        all: &'s [S],
        page: usize,
        page_size: usize,
        mut convert: impl FnMut(&'s S) -> T,
    ) -> Self {
        let total = all.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let items = all
            .get(start..)
            .unwrap_or_default()
            .iter()
            .take(page_size)
            .map(&mut convert)
            .collect();
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// An entity reference with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntitySummary {
    pub id: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Arc<str>>,
    /// `None` for resources that only ever appear as objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
}

/// Everything stated about one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    pub id: Arc<str>,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Arc<str>>,
    /// The entity's statements in document order.
    pub statements: Vec<Statement>,
}

/// Entity and statement counts for the whole graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub papers: usize,
    pub authors: usize,
    pub organizations: usize,
    pub journals: usize,
    pub keywords: usize,
    pub untyped: usize,
    pub entities: usize,
    pub triples: usize,
}

/// A row of the paper list: title, first author and year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRow {
    pub id: Arc<str>,
    pub title: Option<String>,
    pub author: Option<EntitySummary>,
    pub year: Option<i32>,
}

/// A row of the author list: name and first affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRow {
    pub author: EntitySummary,
    /// The author's own name literal, which may differ from the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<EntitySummary>,
}

/// The detail page of one paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperDetail {
    pub id: Arc<str>,
    pub title: Option<String>,
    pub authors: Vec<EntitySummary>,
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<EntitySummary>,
    pub keywords: Vec<EntitySummary>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}
