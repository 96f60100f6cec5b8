use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::config::Mode;

/// `GET /api/v3/system/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub build_time: &'static str,
    pub is_debug: bool,
    pub is_production: bool,
    pub is_admin: bool,
    pub app_name: &'static str,
    pub instance_name: String,
    pub shim_version: &'static str,
}

impl SystemStatus {
    /// The version reported is a v3-era *arr release so clients accept the API.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            version: "5.0.0.0",
            build_time: "2026-01-01T00:00:00Z",
            is_debug: false,
            is_production: true,
            is_admin: true,
            app_name: env!("CARGO_PKG_NAME"),
            instance_name: format!("{}-{}", env!("CARGO_PKG_NAME"), mode),
            shim_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RootFolder {
    pub id: i64,
    pub path: &'static str,
}

impl RootFolder {
    pub fn for_mode(mode: Mode) -> Self {
        let path = match mode {
            Mode::Radarr => "/movies",
            Mode::Sonarr => "/tv",
        };
        Self { id: 1, path }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: &'static str,
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self { id: 1, name: "Any" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub cover_type: &'static str,
    pub url: String,
}

impl ImageRef {
    pub fn poster(url: String) -> Self {
        Self {
            cover_type: "poster",
            url,
        }
    }
}

/// One element of `GET /api/v3/movie/lookup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieLookup {
    pub title: String,
    pub year: i32,
    pub tmdb_id: i64,
    pub title_slug: String,
    pub images: Vec<ImageRef>,
}

/// One element of `GET /api/v3/series/lookup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesLookup {
    pub title: String,
    pub tvdb_id: i64,
    pub year: i32,
    pub title_slug: String,
    pub images: Vec<ImageRef>,
    pub season_folder: bool,
    pub series_type: &'static str,
}

/// Outcome of one item of a batch import.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub ok: bool,
    pub tvdb_id: Option<i64>,
    pub tmdb_id: Option<i64>,
    pub msg: Option<String>,
    /// Raw inbound item, echoed back when it could not be understood.
    pub item: Option<serde_json::Value>,
    /// Present when the forwarder ran in dry-run mode.
    pub would_request: Option<serde_json::Value>,
}

impl ItemResult {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            msg: Some(msg.into()),
            ..Default::default()
        }
    }
}

/// Response body of the import endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub results: Vec<ItemResult>,
}

impl ImportSummary {
    pub fn from_results(results: Vec<ItemResult>) -> Self {
        let imported = results.iter().filter(|r| r.ok).count();
        Self {
            imported,
            failed: results.len() - imported,
            results,
        }
    }
}

/// Response body of `POST /api/v3/movie` and `POST /api/v3/series`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedMedia {
    pub id: i64,
    pub title: String,
    pub tmdb_id: Option<i64>,
    pub tvdb_id: Option<i64>,
    pub monitored: bool,
    pub path: String,
    pub added: String,
}
