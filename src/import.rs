//! Add and import pipelines: normalize -> (bridge) -> forward.
//!
//! Batch imports process items one at a time, in input order, and turn every
//! per-item failure into an [`ItemResult`]. Single-item adds fail as a whole.

use serde_json::Value;
use tracing::{info, warn};

use crate::config::Mode;
use crate::error::ShimError;
use crate::forwarder::ForwardOutcome;
use crate::models::arr::{AddedMedia, ImportSummary, ItemResult};
use crate::models::overseerr::MediaKind;
use crate::normalize::{MediaShape, MOVIE, SERIES};
use crate::util::{utc_timestamp, AppState};

/// Add and import calls only exist for the impersonated mode.
pub fn require_mode(state: &AppState, mode: Mode) -> Result<(), ShimError> {
    if state.config.mode == mode {
        Ok(())
    } else {
        Err(ShimError::NotApplicable(mode))
    }
}

fn submitted(mut result: ItemResult, outcome: &ForwardOutcome) -> ItemResult {
    result.ok = true;
    result.would_request = outcome.would_request();
    result
}

fn missing(shape: &MediaShape, item: Value) -> ItemResult {
    let msg = shape.missing_message();
    warn!(%item, "{msg}");
    ItemResult {
        item: Some(item),
        ..ItemResult::failed(msg)
    }
}

/// `POST /api/v3/movie/import`
pub async fn import_movies(state: &AppState, raw: Value) -> Result<ImportSummary, ShimError> {
    require_mode(state, Mode::Radarr)?;

    let items = MOVIE.normalize(raw);
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let Some(tmdb_id) = MOVIE.extract_id(&item) else {
            results.push(missing(&MOVIE, item));
            continue;
        };

        let base = ItemResult {
            tmdb_id: Some(tmdb_id),
            ..Default::default()
        };
        let result = match state.forwarder.forward(MediaKind::Movie, tmdb_id).await {
            Ok(outcome) => submitted(base, &outcome),
            Err(e) => {
                warn!(tmdb_id, error = %e, "movie import item failed");
                ItemResult {
                    msg: Some(e.to_string()),
                    ..base
                }
            }
        };
        results.push(result);
    }

    let summary = ImportSummary::from_results(results);
    info!(imported = summary.imported, failed = summary.failed, "movie import finished");
    Ok(summary)
}

/// `POST /api/v3/series/import`
pub async fn import_series(state: &AppState, raw: Value) -> Result<ImportSummary, ShimError> {
    require_mode(state, Mode::Sonarr)?;

    let items = SERIES.normalize(raw);
    let mut results = Vec::with_capacity(items.len());

    for item in items {
        let Some(tvdb_id) = SERIES.extract_id(&item) else {
            results.push(missing(&SERIES, item));
            continue;
        };

        let base = ItemResult {
            tvdb_id: Some(tvdb_id),
            ..Default::default()
        };

        let tmdb_id = match state.bridge.resolve(tvdb_id).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!(tvdb_id, "no tmdb id for tvdb id");
                results.push(ItemResult {
                    msg: Some("tvdb->tmdb conversion failed".into()),
                    ..base
                });
                continue;
            }
            Err(e) => {
                warn!(tvdb_id, error = %e, "tvdb->tmdb lookup failed");
                results.push(ItemResult {
                    msg: Some(e.to_string()),
                    ..base
                });
                continue;
            }
        };

        let base = ItemResult {
            tmdb_id: Some(tmdb_id),
            ..base
        };
        let result = match state.forwarder.forward(MediaKind::Series, tmdb_id).await {
            Ok(outcome) => submitted(base, &outcome),
            Err(e) => {
                warn!(tvdb_id, tmdb_id, error = %e, "series import item failed");
                ItemResult {
                    msg: Some(e.to_string()),
                    ..base
                }
            }
        };
        results.push(result);
    }

    let summary = ImportSummary::from_results(results);
    info!(imported = summary.imported, failed = summary.failed, "series import finished");
    Ok(summary)
}

fn added(state: &AppState, body: &Value, tmdb_id: Option<i64>, tvdb_id: Option<i64>) -> AddedMedia {
    AddedMedia {
        id: state.ids.next_id(),
        title: body
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        tmdb_id,
        tvdb_id,
        monitored: body.get("monitored").and_then(Value::as_bool).unwrap_or(true),
        path: body
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        added: utc_timestamp(),
    }
}

/// `POST /api/v3/movie`
pub async fn add_movie(state: &AppState, body: Value) -> Result<AddedMedia, ShimError> {
    require_mode(state, Mode::Radarr)?;

    let tmdb_id = MOVIE
        .extract_id(&body)
        .ok_or_else(|| ShimError::Validation("Missing tmdbId in Radarr add payload".into()))?;

    let outcome = state.forwarder.forward(MediaKind::Movie, tmdb_id).await?;
    info!(tmdb_id, outcome = %outcome.to_json(), "movie add forwarded");

    Ok(added(state, &body, Some(tmdb_id), None))
}

/// `POST /api/v3/series`
pub async fn add_series(state: &AppState, body: Value) -> Result<AddedMedia, ShimError> {
    require_mode(state, Mode::Sonarr)?;

    let tvdb_id = SERIES
        .extract_id(&body)
        .ok_or_else(|| ShimError::Validation("Missing tvdbId in Sonarr add payload".into()))?;

    let tmdb_id = state.bridge.resolve(tvdb_id).await?.ok_or_else(|| {
        ShimError::Validation("Could not convert tvdbId -> tmdbId (set TMDB_API_KEY)".into())
    })?;

    let outcome = state.forwarder.forward(MediaKind::Series, tmdb_id).await?;
    info!(tvdb_id, tmdb_id, outcome = %outcome.to_json(), "series add forwarded");

    Ok(added(state, &body, None, Some(tvdb_id)))
}
