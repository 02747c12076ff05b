//! HTTP handlers.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::{self, Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::config::Config;
use super::response::{FilmCharactersResponse, HealthResponse, Meta, PaginatedResponse};
use crate::gateway::Gateway;
use crate::pipeline::{self, FilterParams, Filters, PageWindow, SortOrder};
use crate::types::{Locator, Query, Relation};
use crate::{HolonetError, Result};

/// Shared state for every handler.
pub struct AppState {
    gateway: Gateway,
    resources: BTreeSet<String>,
}

impl AppState {
    pub fn new(gateway: Gateway, resources: BTreeSet<String>) -> Self {
        Self { gateway, resources }
    }

    /// Build the gateway and resource allow-list from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = config.gateway_builder()?.build()?;
        Ok(Self::new(gateway, config.resources.supported.clone()))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}

/// Build the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/resources/{resource}", get(list_resource))
        .route("/v1/films/{film_id}/characters", get(film_characters))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::version_string(),
        build: crate::BuildInfo::current(),
    })
}

/// Query parameters of `GET /v1/resources/{resource}`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub fields: Option<String>,
    pub include: Option<String>,
    #[serde(flatten)]
    pub filters: FilterParams,
}

#[instrument(skip_all, fields(resource = %resource))]
async fn list_resource(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    extract::Query(params): extract::Query<ListParams>,
) -> Result<Json<PaginatedResponse>> {
    let resource = resource.to_lowercase();
    if !state.resources.contains(&resource) {
        let known: Vec<&str> = state.resources.iter().map(String::as_str).collect();
        return Err(HolonetError::BadRequest(format!(
            "Unsupported resource: {resource}. Use one of [{}]",
            known.join(", ")
        )));
    }

    let page = parse_count("page", params.page.as_deref(), 1)?;
    if page < 1 {
        return Err(HolonetError::BadRequest("page must be >= 1".into()));
    }
    let filters = Filters::parse(&params.filters)?;
    let order = SortOrder::parse(params.order.as_deref());
    let include = pipeline::parse_csv(params.include.as_deref());
    let fields = pipeline::parse_csv(params.fields.as_deref());

    let mut query = Query::new().param("page", page);
    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.insert("search", search);
    }

    let upstream = state
        .gateway
        .get_page(format!("{resource}/"), &query)
        .await?;

    let filtered = filters.apply(upstream.results);
    let sorted = pipeline::sort_records(filtered, params.sort.as_deref(), order)?;
    let enriched = state.gateway.enrich_all(sorted, &include).await?;
    let results = pipeline::project_all(enriched, &fields);
    debug!(results = results.len(), "resource page assembled");

    Ok(Json(PaginatedResponse {
        resource,
        count: upstream.count.unwrap_or(results.len() as u64),
        page,
        page_size: results.len(),
        next: upstream.next,
        previous: upstream.previous,
        results,
        meta: Meta {
            sort: params.sort,
            order: Some(params.order.unwrap_or_else(|| "asc".to_string())),
            filters_applied: filters.applied(),
            included: include,
        },
    }))
}

/// Query parameters of `GET /v1/films/{film_id}/characters`.
#[derive(Debug, Default, Deserialize)]
pub struct CharacterParams {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub fields: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[instrument(skip_all, fields(film_id = %film_id))]
async fn film_characters(
    State(state): State<Arc<AppState>>,
    Path(film_id): Path<String>,
    extract::Query(params): extract::Query<CharacterParams>,
) -> Result<Json<FilmCharactersResponse>> {
    let film_id: u64 = film_id
        .parse()
        .map_err(|_| HolonetError::BadRequest(format!("Invalid film id: {film_id}")))?;
    let window = PageWindow::new(
        parse_count("page", params.page.as_deref(), 1)?,
        parse_count("page_size", params.page_size.as_deref(), 10)?,
    )?;

    let film = state
        .gateway
        .get(format!("films/{film_id}/"), &Query::new())
        .await?;

    let locators: Vec<Locator> = match film.relation("characters") {
        Some(Relation::Many(locators)) => locators,
        Some(Relation::One(locator)) => vec![locator],
        None => Vec::new(),
    };
    let characters = state.gateway.get_all(&locators).await?;

    let sort = params.sort.as_deref().or(Some("name"));
    let order = SortOrder::parse(params.order.as_deref());
    let sorted = pipeline::sort_records(characters, sort, order)?;
    let fields = pipeline::parse_csv(params.fields.as_deref());
    let projected = pipeline::project_all(sorted, &fields);

    let count = projected.len();
    let results = pipeline::paginate(projected, window);

    Ok(Json(FilmCharactersResponse {
        film_id,
        film_title: film.get_str("title").map(str::to_string),
        count,
        page: window.page,
        page_size: results.len(),
        results,
    }))
}

/// Parse a non-negative integer parameter, falling back to `default` when
/// absent.
fn parse_count(name: &str, raw: Option<&str>, default: usize) -> Result<usize> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| HolonetError::BadRequest(format!("Invalid integer for {name}: {raw}"))),
    }
}
