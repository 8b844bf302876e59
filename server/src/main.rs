#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code to prevent panics from corrupt data.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use research_graph::query::{AuthorRow, EntitySummary, Page, PaperDetail, PaperRow, SortKey};
use research_graph::resolver::resource_iri;
use research_graph::service::GraphSnapshot;
use research_graph::turtle::{write_jsonld, write_turtle};
use research_graph::{GraphService, QueryError, ServerConfig, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    /// Owns the current graph snapshot; each request clones it once.
    service: Arc<GraphService>,
    /// Base IRI for `/research/{entity_type}/{entity_id}`.
    resource_base: Arc<str>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "research_graph=debug,server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: triple_path={}, listen_port={}",
        config.graph.triple_path.display(),
        config.listen_port
    );

    // A graph that fails to load is never served.
    let service = match GraphService::load(config.graph.clone()) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to load graph: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState {
        service: Arc::new(service),
        resource_base: Arc::from(config.resource_base.as_str()),
    };

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/papers", get(papers_handler))
        .route("/papers/year/{year}", get(papers_by_year_handler))
        .route("/papers/{paper_id}", get(paper_detail_handler))
        .route("/authors", get(authors_handler))
        .route("/organizations", get(organizations_handler))
        .route("/journals", get(journals_handler))
        .route("/keywords", get(keywords_handler))
        .route("/search", get(search_handler))
        .route("/research/{entity_type}/{entity_id}", get(research_handler))
        .route("/resource", get(resource_handler))
        .route("/xref", get(xref_handler))
        .route("/coauthors", get(coauthors_handler))
        .route("/author_papers", get(author_papers_handler))
        .route("/members", get(members_handler))
        .route("/reload", post(reload_handler))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    });
}

/// Error body returned to clients.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::NotFound(_) => Self::NotFound("Resource not found".to_string()),
            QueryError::InvalidArgument(message) => Self::BadRequest(message),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Internal(message) => {
                tracing::error!("request failed: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Representation chosen by `_format` or the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// The application's own JSON view.
    Json,
    JsonLd,
    Turtle,
}

impl Format {
    /// `_format` wins: `ttl`/`turtle` or `json`/`jsonld`/`json-ld`.
    /// Otherwise `Accept` picks JSON-LD for `application/ld+json` or
    /// `application/json`, then Turtle for `text/turtle`. Anything else gets
    /// the JSON view.
    fn negotiate(format: Option<&str>, headers: &HeaderMap) -> Self {
        match format.map(str::trim) {
            Some("ttl" | "turtle") => return Self::Turtle,
            Some("json" | "jsonld" | "json-ld") => return Self::JsonLd,
            _ => {}
        }
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if accept.contains("application/ld+json") || accept.contains("application/json") {
            Self::JsonLd
        } else if accept.contains("text/turtle") {
            Self::Turtle
        } else {
            Self::Json
        }
    }
}

fn turtle_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/turtle; charset=utf-8")],
        body,
    )
        .into_response()
}

fn jsonld_response(document: Value) -> Response {
    (
        [(header::CONTENT_TYPE, "application/ld+json")],
        Json(document),
    )
        .into_response()
}

fn current(state: &AppState) -> Result<Arc<GraphSnapshot>, ApiError> {
    Ok(state.service.snapshot()?)
}

#[derive(Debug, Default, Deserialize)]
struct FormatParams {
    #[serde(rename = "_format")]
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<i64>,
    page_size: Option<i64>,
    sort: Option<String>,
}

impl PageParams {
    fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    /// Unknown sort names fall back to label order.
    fn sort(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(SortKey::parse)
    }
}

async fn home_handler(
    State(state): State<AppState>,
    Query(params): Query<FormatParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let snapshot = current(&state)?;
    let statements = snapshot.graph().statements();
    Ok(match Format::negotiate(params.format.as_deref(), &headers) {
        Format::Turtle => turtle_response(write_turtle(statements)),
        Format::JsonLd => jsonld_response(write_jsonld(statements)),
        Format::Json => Json(snapshot.engine().statistics()).into_response(),
    })
}

async fn papers_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PaperRow>>, ApiError> {
    let snapshot = current(&state)?;
    let page = snapshot
        .engine()
        .paper_rows(params.page(), params.page_size, params.sort());
    Ok(Json(page))
}

async fn papers_by_year_handler(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PaperRow>>, ApiError> {
    let snapshot = current(&state)?;
    let page = snapshot
        .engine()
        .papers_by_year(year, params.page(), params.page_size);
    Ok(Json(page))
}

async fn authors_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<AuthorRow>>, ApiError> {
    let snapshot = current(&state)?;
    let rows = snapshot
        .engine()
        .author_rows(params.page(), params.page_size, params.sort());
    Ok(Json(rows))
}

async fn paper_detail_handler(
    State(state): State<AppState>,
    Path(paper_id): Path<String>,
) -> Result<Json<PaperDetail>, ApiError> {
    let snapshot = current(&state)?;
    let iri = resource_iri(&state.resource_base, "paper", &paper_id);
    Ok(Json(snapshot.engine().paper_detail(&iri)?))
}

fn list_kind(
    state: &AppState,
    kind: &str,
    params: &PageParams,
) -> Result<Json<Page<EntitySummary>>, ApiError> {
    let snapshot = current(state)?;
    let page = snapshot
        .engine()
        .list_by_type(kind, params.page(), params.page_size, params.sort());
    Ok(Json(page))
}

async fn organizations_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<EntitySummary>>, ApiError> {
    list_kind(&state, "organization", &params)
}

async fn journals_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<EntitySummary>>, ApiError> {
    list_kind(&state, "journal", &params)
}

async fn keywords_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<EntitySummary>>, ApiError> {
    list_kind(&state, "keyword", &params)
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<i64>,
    page_size: Option<i64>,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<EntitySummary>>, ApiError> {
    let snapshot = current(&state)?;
    let page = snapshot.engine().search(
        &params.q,
        params.kind.as_deref(),
        params.page.unwrap_or(1),
        params.page_size,
    );
    Ok(Json(page))
}

/// Resolve `id` in the negotiated representation.
fn resolve(snapshot: &GraphSnapshot, id: &str, format: Format) -> Result<Response, ApiError> {
    let resolver = snapshot.resolver();
    match format {
        Format::Turtle => Ok(turtle_response(resolver.to_turtle(id)?)),
        Format::JsonLd => Ok(jsonld_response(resolver.to_jsonld(id)?)),
        Format::Json => Ok(Json(resolver.resolve(id)?).into_response()),
    }
}

async fn research_handler(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, String)>,
    Query(params): Query<FormatParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let snapshot = current(&state)?;
    let iri = resource_iri(&state.resource_base, &entity_type, &entity_id);
    resolve(
        &snapshot,
        &iri,
        Format::negotiate(params.format.as_deref(), &headers),
    )
}

#[derive(Debug, Default, Deserialize)]
struct ResourceParams {
    #[serde(default)]
    uri: String,
    #[serde(rename = "_format")]
    format: Option<String>,
}

async fn resource_handler(
    State(state): State<AppState>,
    Query(params): Query<ResourceParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if params.uri.trim().is_empty() {
        return Err(ApiError::BadRequest("uri must not be empty".to_string()));
    }
    let snapshot = current(&state)?;
    let id = snapshot
        .resolver()
        .canonical_id(&params.uri)
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?
        .clone();
    resolve(
        &snapshot,
        &id,
        Format::negotiate(params.format.as_deref(), &headers),
    )
}

#[derive(Debug, Default, Deserialize)]
struct XrefParams {
    #[serde(default)]
    id: String,
    #[serde(default)]
    relation: String,
}

async fn xref_handler(
    State(state): State<AppState>,
    Query(params): Query<XrefParams>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    let snapshot = current(&state)?;
    let related = snapshot
        .engine()
        .cross_reference(&params.id, &params.relation)?;
    Ok(Json(related))
}

#[derive(Debug, Default, Deserialize)]
struct IdParams {
    #[serde(default)]
    id: String,
}

async fn coauthors_handler(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    let snapshot = current(&state)?;
    Ok(Json(snapshot.engine().coauthors(&params.id)?))
}

async fn author_papers_handler(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<PaperRow>>, ApiError> {
    let snapshot = current(&state)?;
    Ok(Json(snapshot.engine().papers_by_author(&params.id)?))
}

async fn members_handler(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<Vec<EntitySummary>>, ApiError> {
    let snapshot = current(&state)?;
    Ok(Json(snapshot.engine().organization_members(&params.id)?))
}

#[derive(Serialize)]
struct ReloadResponse {
    generation: u64,
    statements: usize,
    subjects: usize,
}

async fn reload_handler(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let service = Arc::clone(&state.service);
    // Loading reads the file; keep it off the async workers.
    let snapshot = tokio::task::spawn_blocking(move || service.reload())
        .await
        .map_err(|e| ApiError::Internal(format!("reload task failed: {e}")))?
        .map_err(|e| match e {
            ServiceError::Load(load) => ApiError::BadRequest(load.to_string()),
            ServiceError::LockPoisoned => ApiError::Internal(e.to_string()),
        })?;
    Ok(Json(ReloadResponse {
        generation: snapshot.generation(),
        statements: snapshot.graph().len(),
        subjects: snapshot.index().len(),
    }))
}
