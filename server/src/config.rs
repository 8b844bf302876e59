//! Configuration module.
//!
//! Loads the graph and server configuration from environment variables.
//!
//! # Environment Variables
//!
//! - `RESEARCH_GRAPH_TRIPLE_PATH`: Turtle file to load (required)
//! - `RESEARCH_GRAPH_DEFAULT_PAGE_SIZE`: Page size when none is requested (default: `20`)
//! - `RESEARCH_GRAPH_MAX_PAGE_SIZE`: Largest page size served (default: `100`)
//! - `RESEARCH_GRAPH_INCOMING_LIMIT`: Incoming references shown per predicate (default: `50`)
//! - `RESEARCH_GRAPH_TYPE_PREDICATE`: Predicate naming an entity's type (default: `rdf:type`)
//! - `RESEARCH_GRAPH_LABEL_PREDICATES`: Comma separated label predicates, highest priority first
//! - `RESEARCH_GRAPH_SEARCH_PREDICATES`: Comma separated predicates whose literals are searchable
//!   (default: the label predicates)
//! - `RESEARCH_GRAPH_LISTEN_PORT`: Port to listen on (default: `8080`)
//! - `RESEARCH_GRAPH_RESOURCE_BASE`: Base IRI for `/research/{type}/{id}` paths
//!   (default: `http://bupt.edu.cn/research/`)
//!
//! Predicates may be given as full IRIs or as `prefix:local` names under a
//! well-known prefix.
//!
//! # Invariants
//!
//! - `1 <= default_page_size <= max_page_size`
//! - `incoming_limit >= 1`
//! - `label_predicates` and `search_predicates` are never empty

use std::path::PathBuf;

use crate::index::IndexSettings;
use crate::query::QuerySettings;
use crate::vocab;

const TRIPLE_PATH: &str = "RESEARCH_GRAPH_TRIPLE_PATH";
const DEFAULT_PAGE_SIZE: &str = "RESEARCH_GRAPH_DEFAULT_PAGE_SIZE";
const MAX_PAGE_SIZE: &str = "RESEARCH_GRAPH_MAX_PAGE_SIZE";
const INCOMING_LIMIT: &str = "RESEARCH_GRAPH_INCOMING_LIMIT";
const TYPE_PREDICATE: &str = "RESEARCH_GRAPH_TYPE_PREDICATE";
const LABEL_PREDICATES: &str = "RESEARCH_GRAPH_LABEL_PREDICATES";
const SEARCH_PREDICATES: &str = "RESEARCH_GRAPH_SEARCH_PREDICATES";
const LISTEN_PORT: &str = "RESEARCH_GRAPH_LISTEN_PORT";
const RESOURCE_BASE: &str = "RESEARCH_GRAPH_RESOURCE_BASE";

/// Configuration consumed by the core: where the graph lives and how it is
/// indexed and paged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Turtle file produced by the conversion step.
    pub triple_path: PathBuf,
    pub index: IndexSettings,
    pub query: QuerySettings,
}

/// Server configuration: the graph plus what only the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub graph: GraphConfig,
    /// Port to listen on for HTTP requests.
    pub listen_port: u16,
    /// Base IRI that `/research/{type}/{id}` paths are resolved against.
    pub resource_base: String,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl GraphConfig {
    /// Configuration for `triple_path` with every other setting defaulted.
    #[must_use]
    pub fn new(triple_path: impl Into<PathBuf>) -> Self {
        Self {
            triple_path: triple_path.into(),
            index: IndexSettings::default(),
            query: QuerySettings::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `RESEARCH_GRAPH_TRIPLE_PATH` is not set or is empty
    /// - a numeric variable is set but not a positive integer
    /// - the maximum page size is below the default page size
    /// - a predicate list is set but names no predicate
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Same as [`GraphConfig::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let triple_path = load_triple_path(lookup)?;
        let query = load_query_settings(lookup)?;
        let index = load_index_settings(lookup)?;

        Ok(Self {
            triple_path,
            index,
            query,
        })
    }
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default base IRI for research resources.
    pub const DEFAULT_RESOURCE_BASE: &'static str = vocab::BUPT;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph configuration is invalid, or if
    /// `RESEARCH_GRAPH_LISTEN_PORT` is set but not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Load configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let graph = GraphConfig::from_lookup(lookup)?;
        let listen_port = Self::load_listen_port(lookup)?;
        let resource_base = Self::load_resource_base(lookup);

        Ok(Self {
            graph,
            listen_port,
            resource_base,
        })
    }

    /// Load the listen port. Returns the default if not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is set but not a valid port number.
    fn load_listen_port(lookup: &dyn Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
        match lookup(LISTEN_PORT) {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => Ok(port),
                _ => Err(ConfigError::InvalidValue {
                    name: LISTEN_PORT.to_string(),
                    message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                }),
            },
            None => Ok(Self::DEFAULT_PORT),
        }
    }

    /// Load the resource base. A trailing `/` is added when missing.
    fn load_resource_base(lookup: &dyn Fn(&str) -> Option<String>) -> String {
        let base = lookup(RESOURCE_BASE)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_RESOURCE_BASE.to_string());
        if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        }
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// # Errors
///
/// Returns an error if the variable is not set or is empty.
fn load_triple_path(lookup: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf, ConfigError> {
    let path = lookup(TRIPLE_PATH).ok_or_else(|| ConfigError::MissingEnvVar(TRIPLE_PATH.to_string()))?;

    if path.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            name: TRIPLE_PATH.to_string(),
            message: "must not be empty".to_string(),
        });
    }

    Ok(PathBuf::from(path))
}

fn load_query_settings(lookup: &dyn Fn(&str) -> Option<String>) -> Result<QuerySettings, ConfigError> {
    let default_page_size =
        load_positive(lookup, DEFAULT_PAGE_SIZE, QuerySettings::DEFAULT_PAGE_SIZE)?;
    let max_page_size = load_positive(
        lookup,
        MAX_PAGE_SIZE,
        QuerySettings::MAX_PAGE_SIZE.max(default_page_size),
    )?;
    let incoming_limit = load_positive(lookup, INCOMING_LIMIT, QuerySettings::INCOMING_LIMIT)?;

    if max_page_size < default_page_size {
        return Err(ConfigError::InvalidValue {
            name: MAX_PAGE_SIZE.to_string(),
            message: format!(
                "{max_page_size} is smaller than the default page size {default_page_size}"
            ),
        });
    }

    Ok(QuerySettings {
        default_page_size,
        max_page_size,
        incoming_limit,
    })
}

fn load_index_settings(lookup: &dyn Fn(&str) -> Option<String>) -> Result<IndexSettings, ConfigError> {
    let defaults = IndexSettings::default();

    let type_predicate = match lookup(TYPE_PREDICATE) {
        Some(value) => parse_predicate(TYPE_PREDICATE, &value)?,
        None => defaults.type_predicate,
    };
    let label_predicates = match lookup(LABEL_PREDICATES) {
        Some(value) => parse_predicate_list(LABEL_PREDICATES, &value)?,
        None => defaults.label_predicates,
    };
    let search_predicates = match lookup(SEARCH_PREDICATES) {
        Some(value) => parse_predicate_list(SEARCH_PREDICATES, &value)?,
        None => label_predicates.clone(),
    };

    Ok(IndexSettings {
        type_predicate,
        label_predicates,
        search_predicates,
    })
}

/// Load a positive integer. Returns `default` if not set.
///
/// # Errors
///
/// Returns an error if the value is set but is not an integer of at least 1.
fn load_positive(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(name) {
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        },
        None => Ok(default),
    }
}

fn parse_predicate(name: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(vocab::expand_curie(value).unwrap_or_else(|| value.to_string()))
}

fn parse_predicate_list(name: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let predicates: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| vocab::expand_curie(item).unwrap_or_else(|| item.to_string()))
        .collect();
    if predicates.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: "must name at least one predicate".to_string(),
        });
    }
    Ok(predicates)
}
