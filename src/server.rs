use axum::{
    body::Bytes,
    extract::{Query, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Mode;
use crate::error::ShimError;
use crate::import::{add_movie, add_series, import_movies, import_series, require_mode};
use crate::lookup::{lookup_movie, lookup_series};
use crate::models::arr::{QualityProfile, RootFolder, SystemStatus};
use crate::util::AppState;

type SharedState = Arc<AppState>;

/// Query parameters for the lookup endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub term: String,
}

/// Build the Axum router for the impersonated `/api/v3` surface plus `/health`.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let api = Router::new()
        .route("/api/v3/system/status", get(status))
        .route("/api/v3/rootfolder", get(root_folders))
        .route("/api/v3/rootFolder", get(root_folders))
        .route("/api/v3/qualityprofile", get(quality_profiles))
        .route("/api/v3/qualityProfile", get(quality_profiles))
        .route("/api/v3/tag", get(empty_list).post(create_tag))
        .route("/api/v3/exclusions", get(empty_list).post(create_with_id))
        .route(
            "/api/v3/importlistexclusion",
            get(empty_list).post(create_with_id),
        )
        .route("/api/v3/movie", get(empty_list).post(movie_add))
        .route("/api/v3/movie/lookup", get(movie_lookup))
        .route("/api/v3/movie/import", post(movie_import))
        .route("/api/v3/series", get(empty_list).post(series_add))
        .route("/api/v3/series/lookup", get(series_lookup))
        .route("/api/v3/series/import", post(series_import))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Whether a request may proceed given the configured secret and what it supplied.
///
/// A non-empty header takes precedence over the query parameter. An empty
/// configured secret accepts everything.
pub fn is_authorized(secret: &str, header: Option<&str>, query: Option<&str>) -> bool {
    if secret.is_empty() {
        return true;
    }
    let provided = header.filter(|h| !h.is_empty()).or(query);
    provided == Some(secret)
}

async fn require_api_key(
    State(state): State<SharedState>,
    // Repeated parameters collapse to one value instead of rejecting the request.
    Query(q): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());
    if !is_authorized(&state.config.api_key, header, q.get("apikey").map(String::as_str)) {
        tracing::warn!(path = %request.uri().path(), "rejected request with invalid API key");
        return ShimError::Unauthorized.into_response();
    }
    next.run(request).await
}

/// Decode a JSON body regardless of content type; an empty body reads as `{}`.
fn parse_body(body: &Bytes) -> Result<Value, ShimError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

fn body_object(body: &Bytes) -> Result<Map<String, Value>, ShimError> {
    match parse_body(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ShimError::Validation("expected a JSON object".into())),
    }
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true, "mode": state.config.mode }))
}

async fn status(State(state): State<SharedState>) -> Json<SystemStatus> {
    Json(SystemStatus::for_mode(state.config.mode))
}

async fn root_folders(State(state): State<SharedState>) -> Json<Vec<RootFolder>> {
    Json(vec![RootFolder::for_mode(state.config.mode)])
}

async fn quality_profiles() -> Json<Vec<QualityProfile>> {
    Json(vec![QualityProfile::default()])
}

/// Tag lists, exclusion lists, and the movie/series libraries are always empty.
async fn empty_list() -> Json<Vec<Value>> {
    Json(Vec::new())
}

async fn create_tag(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, ShimError> {
    let mut tag = body_object(&body)?;
    tag.entry("label")
        .or_insert_with(|| Value::String("kometa".into()));
    tag.insert("id".into(), state.ids.next_id().into());
    Ok(Json(Value::Object(tag)))
}

/// Exclusion create endpoints: echo the body with a fresh id.
async fn create_with_id(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, ShimError> {
    let mut entry = body_object(&body)?;
    entry.insert("id".into(), state.ids.next_id().into());
    Ok(Json(Value::Object(entry)))
}

async fn movie_lookup(
    State(state): State<SharedState>,
    Query(q): Query<LookupQuery>,
) -> Result<impl IntoResponse, ShimError> {
    Ok(Json(lookup_movie(&state, &q.term).await?))
}

async fn series_lookup(
    State(state): State<SharedState>,
    Query(q): Query<LookupQuery>,
) -> Result<impl IntoResponse, ShimError> {
    Ok(Json(lookup_series(&state, &q.term).await?))
}

async fn movie_import(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ShimError> {
    require_mode(&state, Mode::Radarr)?;
    let raw = parse_body(&body)?;
    Ok(Json(import_movies(&state, raw).await?))
}

async fn series_import(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ShimError> {
    require_mode(&state, Mode::Sonarr)?;
    let raw = parse_body(&body)?;
    Ok(Json(import_series(&state, raw).await?))
}

async fn movie_add(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ShimError> {
    require_mode(&state, Mode::Radarr)?;
    let raw = parse_body(&body)?;
    Ok(Json(add_movie(&state, raw).await?))
}

async fn series_add(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ShimError> {
    require_mode(&state, Mode::Sonarr)?;
    let raw = parse_body(&body)?;
    Ok(Json(add_series(&state, raw).await?))
}
