//! TMDb v3 client used by the identifier bridge and the lookup endpoints.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::models::tmdb::{FindResponse, MovieDetails, TvDetails};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("TMDb has no record for this id")]
    NotFound,
    #[error("TMDb error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("TMDb request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("TMDb returned an unreadable body: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    config: TmdbConfig,
}

impl MetadataClient {
    /// Returns `None` when no TMDb credential is configured.
    pub fn from_config(http: reqwest::Client, config: &TmdbConfig) -> Option<Self> {
        config.is_configured().then(|| Self {
            http,
            config: config.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        let mut all_params = vec![("api_key", self.config.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.config.base_url);
        debug!(url = %url, "TMDb request");

        let resp = self
            .http
            .get(&url)
            .query(&all_params)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| MetadataError::Decode(e.to_string()))
    }

    /// `GET /find/{tvdb_id}?external_source=tvdb_id`
    pub async fn find_by_tvdb_id(&self, tvdb_id: i64) -> Result<FindResponse, MetadataError> {
        self.get_json(
            &format!("/find/{tvdb_id}"),
            &[("external_source", "tvdb_id")],
        )
        .await
    }

    /// Movie details, or `None` when TMDb does not know the id.
    pub async fn movie(&self, tmdb_id: i64) -> Result<Option<MovieDetails>, MetadataError> {
        not_found_as_none(self.get_json(&format!("/movie/{tmdb_id}"), &[]).await)
    }

    /// Series details, or `None` when TMDb does not know the id.
    pub async fn tv(&self, tmdb_id: i64) -> Result<Option<TvDetails>, MetadataError> {
        not_found_as_none(self.get_json(&format!("/tv/{tmdb_id}"), &[]).await)
    }

    /// Absolute poster URL for a TMDb `poster_path`.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{poster_path}", self.config.image_base_url)
    }
}

fn not_found_as_none<T>(res: Result<T, MetadataError>) -> Result<Option<T>, MetadataError> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(MetadataError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}
