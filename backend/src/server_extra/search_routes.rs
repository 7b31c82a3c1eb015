use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::{
    search_query::SearchView,
    search_result::{MoreLikeThisResult, SearchResultDocuments},
};
use serde_json::json;
use tracing::info;

use crate::{
    api::{
        more_like_this::more_like_this,
        search::{
            admin_filter::{AdminCatalog, apply_admin_filter},
            pager::attach_page_links,
            param_codec::QueryParams,
            search_facets::attach_facet_links,
            search_for_results::search_for_results,
            search_request::parse_search_query,
        },
        thumbnails::{ThumbnailSource, add_image_thumbs_to_docs, add_thumbs_to_docs},
    },
    db_utils::solr_utils::SearchClient,
    error::EngineError,
    tables::SearchTables,
};

/// Shared, read-only state of the search service.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn SearchClient>,
    pub tables: Arc<SearchTables>,
    pub admin_catalog: Option<Arc<dyn AdminCatalog>>,
    pub thumbnails: Arc<dyn ThumbnailSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search))
        .route("/mlt/{identifier}", get(similar))
        .route("/thumbs/{identifier}", get(thumbs))
        .with_state(state)
}

async fn _search(state: &AppState, raw_query: Option<String>) -> anyhow::Result<SearchResultDocuments> {
    let params = QueryParams::decode(raw_query.as_deref().unwrap_or(""));
    let query = parse_search_query(&params, &state.tables);
    if query.query_string.is_empty() {
        return Ok(SearchResultDocuments::empty(query));
    }
    info!("search: q={:?} view={} page={}", query.query_string, query.view.as_str(), query.current_page());

    let mut results = search_for_results(state.client.as_ref(), &state.tables, query).await?;
    if let Some(catalog) = &state.admin_catalog {
        apply_admin_filter(&mut results, catalog.as_ref()).await?;
    }
    match results.query.view {
        SearchView::ThumbCompare => add_thumbs_to_docs(&mut results.results, state.thumbnails.as_ref()).await,
        SearchView::Grid => add_image_thumbs_to_docs(&mut results.results, state.thumbnails.as_ref()).await,
        SearchView::Search | SearchView::Facet | SearchView::Collection => {}
    }
    attach_facet_links(&mut results.facets, &params);
    attach_page_links(&mut results.pager, &params);
    Ok(results)
}

async fn search(State(state): State<AppState>, RawQuery(raw_query): RawQuery) -> Response {
    match _search(&state, raw_query).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response("search", e),
    }
}

async fn _similar(state: &AppState, identifier: &str) -> anyhow::Result<MoreLikeThisResult> {
    more_like_this(state.client.as_ref(), &state.tables, identifier).await
}

async fn similar(State(state): State<AppState>, Path(identifier): Path<String>) -> Response {
    match _similar(&state, &identifier).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response("mlt", e),
    }
}

async fn thumbs(State(state): State<AppState>, Path(identifier): Path<String>) -> Response {
    match state.thumbnails.movie_thumbnails(&identifier).await {
        Ok(Some(thumbnails)) => Json(thumbnails).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Body::from(format!("no thumbnails for {identifier}"))).into_response(),
        Err(e) => error_response("thumbs", e),
    }
}

/// 500 with the error chain; engine failures also carry what the engine sent.
fn error_response(route: &str, e: anyhow::Error) -> Response {
    tracing::error!("{}: request failed: {:#?}", route, e);
    let engine_response = e.downcast_ref::<EngineError>().and_then(|e| e.raw_body()).map(String::from);
    let body = json!({
        "error": format!("{:#}", e),
        "engine_response": engine_response,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
