//! Lookup-by-external-id endpoints (`/movie/lookup`, `/series/lookup`).
//!
//! Terms look like `tmdb:27205` or `tvdb:81189`. Terms in another namespace,
//! calls in the other mode, and ids TMDb does not know all yield an empty list.

use tracing::debug;

use crate::config::Mode;
use crate::error::ShimError;
use crate::metadata::MetadataClient;
use crate::models::arr::{ImageRef, MovieLookup, SeriesLookup};
use crate::util::AppState;

/// Raw id part of `<namespace>:<id>`, or `None` when the namespace does not match.
fn term_id<'a>(term: &'a str, namespace: &str) -> Option<&'a str> {
    let (ns, id) = term.trim().split_once(':')?;
    ns.trim().eq_ignore_ascii_case(namespace).then(|| id.trim())
}

fn parse_id(raw: &str, namespace: &str) -> Result<i64, ShimError> {
    raw.parse::<i64>()
        .map_err(|_| ShimError::Validation(format!("Invalid {namespace} id '{raw}'")))
}

fn require_metadata<'a>(
    state: &'a AppState,
    endpoint: &'static str,
) -> Result<&'a MetadataClient, ShimError> {
    state
        .metadata
        .as_ref()
        .ok_or(ShimError::MetadataUnconfigured(endpoint))
}

fn poster_images(metadata: &MetadataClient, poster_path: Option<&str>) -> Vec<ImageRef> {
    poster_path
        .filter(|p| !p.is_empty())
        .map(|p| vec![ImageRef::poster(metadata.poster_url(p))])
        .unwrap_or_default()
}

/// `GET /api/v3/movie/lookup?term=tmdb:<id>`
pub async fn lookup_movie(state: &AppState, term: &str) -> Result<Vec<MovieLookup>, ShimError> {
    if state.config.mode != Mode::Radarr {
        return Ok(Vec::new());
    }
    let Some(raw_id) = term_id(term, "tmdb") else {
        debug!(term, "movie lookup term is not a tmdb id");
        return Ok(Vec::new());
    };
    let metadata = require_metadata(state, "/movie/lookup")?;
    let tmdb_id = parse_id(raw_id, "tmdb")?;

    let Some(movie) = metadata.movie(tmdb_id).await? else {
        debug!(tmdb_id, "movie not found on TMDb");
        return Ok(Vec::new());
    };

    Ok(vec![MovieLookup {
        title: movie.display_title(),
        year: movie.year(),
        tmdb_id,
        title_slug: format!("tmdb-{tmdb_id}"),
        images: poster_images(metadata, movie.poster_path.as_deref()),
    }])
}

/// `GET /api/v3/series/lookup?term=tvdb:<id>`
pub async fn lookup_series(state: &AppState, term: &str) -> Result<Vec<SeriesLookup>, ShimError> {
    if state.config.mode != Mode::Sonarr {
        return Ok(Vec::new());
    }
    let Some(raw_id) = term_id(term, "tvdb") else {
        debug!(term, "series lookup term is not a tvdb id");
        return Ok(Vec::new());
    };
    let metadata = require_metadata(state, "/series/lookup")?;
    let tvdb_id = parse_id(raw_id, "tvdb")?;

    let Some(tmdb_id) = state.bridge.resolve(tvdb_id).await? else {
        debug!(tvdb_id, "no tmdb id for tvdb id");
        return Ok(Vec::new());
    };
    let Some(show) = metadata.tv(tmdb_id).await? else {
        debug!(tmdb_id, "series not found on TMDb");
        return Ok(Vec::new());
    };

    Ok(vec![SeriesLookup {
        title: show.display_title(),
        tvdb_id,
        year: show.year(),
        title_slug: format!("tvdb-{tvdb_id}"),
        images: poster_images(metadata, show.poster_path.as_deref()),
        season_folder: true,
        series_type: "standard",
    }])
}
