//! Vocabulary used by the research graph.
//!
//! Namespace IRIs, the entity kinds the graph recognizes, named relation
//! aliases for cross-references, and prefix compaction for display.

use std::fmt;

use serde::Serialize;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SCHEMA: &str = "http://schema.org/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const BUPT: &str = "http://bupt.edu.cn/research/";
pub const BUPT_ONTOLOGY: &str = "http://bupt.edu.cn/ontology/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_GYEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

pub const SCHEMA_NAME: &str = "http://schema.org/name";
pub const SCHEMA_AUTHOR: &str = "http://schema.org/author";
pub const SCHEMA_AFFILIATION: &str = "http://schema.org/affiliation";
pub const SCHEMA_MEMBER: &str = "http://schema.org/member";
pub const SCHEMA_IS_PART_OF: &str = "http://schema.org/isPartOf";
pub const SCHEMA_HAS_PART: &str = "http://schema.org/hasPart";
pub const SCHEMA_KEYWORDS: &str = "http://schema.org/keywords";
pub const SCHEMA_ABOUT: &str = "http://schema.org/about";
pub const SCHEMA_DATE_PUBLISHED: &str = "http://schema.org/datePublished";
pub const SCHEMA_DESCRIPTION: &str = "http://schema.org/description";
pub const SCHEMA_URL: &str = "http://schema.org/url";
pub const SCHEMA_SCHOLARLY_ARTICLE: &str = "http://schema.org/ScholarlyArticle";
pub const SCHEMA_ORGANIZATION: &str = "http://schema.org/Organization";
pub const SCHEMA_PERIODICAL: &str = "http://schema.org/Periodical";
pub const SCHEMA_DEFINED_TERM: &str = "http://schema.org/DefinedTerm";

pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const FOAF_PERSON: &str = "http://xmlns.com/foaf/0.1/Person";

pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DCTERMS_CREATOR: &str = "http://purl.org/dc/terms/creator";
pub const DCTERMS_DATE: &str = "http://purl.org/dc/terms/date";
pub const DCTERMS_SOURCE: &str = "http://purl.org/dc/terms/source";
pub const DCTERMS_ABSTRACT: &str = "http://purl.org/dc/terms/abstract";

/// Well-known prefixes, in the order they are tried during compaction.
pub const PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("schema", SCHEMA),
    ("foaf", FOAF),
    ("dcterms", DCTERMS),
    ("bupt-onto", BUPT_ONTOLOGY),
    ("bupt", BUPT),
];

/// Predicates linking a paper to its authors.
pub const AUTHORSHIP_PREDICATES: &[&str] = &[SCHEMA_AUTHOR, DCTERMS_CREATOR];

/// Predicates carrying a paper's publication year.
pub const YEAR_PREDICATES: &[&str] = &[SCHEMA_DATE_PUBLISHED, DCTERMS_DATE];

/// Named relations accepted by cross-reference lookups.
///
/// Each alias expands to one or more predicate IRIs, all traversed in both
/// directions.
pub const RELATION_ALIASES: &[(&str, &[&str])] = &[
    ("authoredBy", AUTHORSHIP_PREDICATES),
    ("author", AUTHORSHIP_PREDICATES),
    ("creator", AUTHORSHIP_PREDICATES),
    ("affiliation", &[SCHEMA_AFFILIATION, SCHEMA_MEMBER]),
    ("member", &[SCHEMA_MEMBER, SCHEMA_AFFILIATION]),
    (
        "publishedIn",
        &[SCHEMA_IS_PART_OF, DCTERMS_SOURCE, SCHEMA_HAS_PART],
    ),
    ("keyword", &[SCHEMA_KEYWORDS, SCHEMA_ABOUT]),
];

/// The kinds of entity the graph distinguishes.
///
/// Anything whose type predicate is missing or names an unrecognized type
/// is `Untyped`: still indexed and resolvable, never listed by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Paper,
    Author,
    Organization,
    Journal,
    Keyword,
    Untyped,
}

impl EntityKind {
    /// Every kind that can be listed by type.
    pub const LISTABLE: [Self; 5] = [
        Self::Paper,
        Self::Author,
        Self::Organization,
        Self::Journal,
        Self::Keyword,
    ];

    /// Map a type IRI to a kind. Returns `None` for unrecognized types.
    #[must_use]
    pub fn from_type_iri(iri: &str) -> Option<Self> {
        match iri {
            SCHEMA_SCHOLARLY_ARTICLE => Some(Self::Paper),
            FOAF_PERSON => Some(Self::Author),
            SCHEMA_ORGANIZATION => Some(Self::Organization),
            SCHEMA_PERIODICAL => Some(Self::Journal),
            SCHEMA_DEFINED_TERM => Some(Self::Keyword),
            _ => None,
        }
    }

    /// Parse a caller-supplied type name.
    ///
    /// Accepts the kind name in any case, its plural, or the type IRI.
    /// `untyped` is deliberately not accepted.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(kind) = Self::from_type_iri(name) {
            return Some(kind);
        }
        match name.to_ascii_lowercase().as_str() {
            "paper" | "papers" | "article" | "articles" => Some(Self::Paper),
            "author" | "authors" | "person" | "people" => Some(Self::Author),
            "organization" | "organizations" | "org" | "orgs" => Some(Self::Organization),
            "journal" | "journals" | "periodical" => Some(Self::Journal),
            "keyword" | "keywords" => Some(Self::Keyword),
            _ => None,
        }
    }

    /// The canonical type IRI, if the kind has one.
    #[must_use]
    pub const fn type_iri(self) -> Option<&'static str> {
        match self {
            Self::Paper => Some(SCHEMA_SCHOLARLY_ARTICLE),
            Self::Author => Some(FOAF_PERSON),
            Self::Organization => Some(SCHEMA_ORGANIZATION),
            Self::Journal => Some(SCHEMA_PERIODICAL),
            Self::Keyword => Some(SCHEMA_DEFINED_TERM),
            Self::Untyped => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paper => "paper",
            Self::Author => "author",
            Self::Organization => "organization",
            Self::Journal => "journal",
            Self::Keyword => "keyword",
            Self::Untyped => "untyped",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expand a relation name into the predicate IRIs it covers.
///
/// Lookup order: alias table, then `prefix:local` with a well-known prefix,
/// then the name itself taken as a predicate IRI.
#[must_use]
pub fn expand_relation(relation: &str) -> Vec<String> {
    let relation = relation.trim();
    if let Some((_, predicates)) = RELATION_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(relation))
    {
        return predicates.iter().map(|p| (*p).to_owned()).collect();
    }
    if let Some(expanded) = expand_curie(relation) {
        return vec![expanded];
    }
    vec![relation.to_owned()]
}

/// Expand `prefix:local` using the well-known prefixes.
#[must_use]
pub fn expand_curie(curie: &str) -> Option<String> {
    let (prefix, local) = curie.split_once(':')?;
    if local.starts_with("//") {
        return None;
    }
    PREFIXES
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, namespace)| format!("{namespace}{local}"))
}

/// Compact an IRI to `prefix:local` form when a well-known namespace matches.
#[must_use]
pub fn compact_iri(iri: &str) -> String {
    for (prefix, namespace) in PREFIXES {
        if let Some(local) = iri.strip_prefix(namespace) {
            if !local.is_empty() && !local.contains('/') {
                return format!("{prefix}:{local}");
            }
        }
    }
    iri.to_owned()
}
