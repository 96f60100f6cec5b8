//! Forwarding of canonical media requests to Overseerr.

use http::header;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{OverseerrConfig, SeasonPolicy};
use crate::models::overseerr::{CanonicalRequest, MediaKind, SeasonSelection};

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Overseerr not configured (OVERSEERR_URL/OVERSEERR_API_KEY)")]
    NotConfigured,
    #[error("Overseerr error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Overseerr request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Overseerr returned an unreadable body: {0}")]
    Decode(String),
}

/// What a forward produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    /// Overseerr accepted the request; holds its response payload.
    Submitted(Value),
    /// Dry-run mode: nothing was sent.
    DryRun(CanonicalRequest),
}

impl ForwardOutcome {
    /// JSON view of the outcome.
    ///
    /// Dry runs render as `{"dry_run": true, "would_request": {...}}`.
    pub fn to_json(&self) -> Value {
        match self {
            ForwardOutcome::Submitted(v) => v.clone(),
            ForwardOutcome::DryRun(req) => serde_json::json!({
                "dry_run": true,
                "would_request": req,
            }),
        }
    }

    /// The request that would have been sent, for dry runs.
    pub fn would_request(&self) -> Option<Value> {
        match self {
            ForwardOutcome::DryRun(req) => serde_json::to_value(req).ok(),
            ForwardOutcome::Submitted(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct RequestForwarder {
    http: reqwest::Client,
    config: OverseerrConfig,
    seasons: SeasonPolicy,
    dry_run: bool,
}

impl RequestForwarder {
    pub fn new(
        http: reqwest::Client,
        config: OverseerrConfig,
        seasons: SeasonPolicy,
        dry_run: bool,
    ) -> Self {
        Self {
            http,
            config,
            seasons,
            dry_run,
        }
    }

    /// Canonical request body for a TMDb id.
    pub fn canonical_request(&self, kind: MediaKind, tmdb_id: i64) -> CanonicalRequest {
        let seasons = match (kind, self.seasons) {
            (MediaKind::Series, SeasonPolicy::All) => Some(SeasonSelection::All),
            (MediaKind::Series, SeasonPolicy::First) => Some(SeasonSelection::Numbers(vec![1])),
            _ => None,
        };
        CanonicalRequest {
            media_type: kind,
            media_id: tmdb_id,
            user_id: self.config.user_id,
            seasons,
        }
    }

    /// Create a request in Overseerr, or describe it when in dry-run mode.
    ///
    /// An unconfigured Overseerr fails before anything else, dry run included.
    pub async fn forward(
        &self,
        kind: MediaKind,
        tmdb_id: i64,
    ) -> Result<ForwardOutcome, ForwardError> {
        if !self.config.is_configured() {
            return Err(ForwardError::NotConfigured);
        }

        let payload = self.canonical_request(kind, tmdb_id);

        if self.dry_run {
            info!(media_type = kind.as_str(), tmdb_id, "dry run; request not sent");
            return Ok(ForwardOutcome::DryRun(payload));
        }

        let url = format!("{}/api/v1/request", self.config.base_url);
        debug!(url = %url, media_type = kind.as_str(), tmdb_id, "forwarding request");

        let resp = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .timeout(self.config.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ForwardError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(media_type = kind.as_str(), tmdb_id, status = status.as_u16(), "request created");

        if text.trim().is_empty() {
            return Ok(ForwardOutcome::Submitted(serde_json::json!({ "ok": true })));
        }
        serde_json::from_str(&text)
            .map(ForwardOutcome::Submitted)
            .map_err(|e| ForwardError::Decode(e.to_string()))
    }
}
