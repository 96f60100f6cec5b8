use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::config::Mode;
use crate::forwarder::ForwardError;
use crate::metadata::MetadataError;
use crate::util::error_response;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Invalid API key")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Not in {0} mode")]
    NotApplicable(Mode),
    #[error("TMDB_API_KEY is required for {0}")]
    MetadataUnconfigured(&'static str),
    #[error(transparent)]
    Forward(#[from] ForwardError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl ShimError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShimError::Unauthorized => StatusCode::UNAUTHORIZED,
            ShimError::Validation(_)
            | ShimError::InvalidJson(_)
            | ShimError::MetadataUnconfigured(_) => StatusCode::BAD_REQUEST,
            ShimError::NotApplicable(_) => StatusCode::NOT_FOUND,
            ShimError::Forward(ForwardError::NotConfigured) => StatusCode::INTERNAL_SERVER_ERROR,
            ShimError::Forward(_) | ShimError::Metadata(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ShimError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {self}");
        } else {
            tracing::debug!(status = status.as_u16(), "request rejected: {self}");
        }
        error_response(status, &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ShimError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ShimError::Validation("Missing tmdbId".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShimError::MetadataUnconfigured("/movie/lookup").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShimError::NotApplicable(Mode::Radarr).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ShimError::Forward(ForwardError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ShimError::Forward(ForwardError::Upstream {
                status: 409,
                body: "exists".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ShimError::Metadata(MetadataError::Status {
                status: 401,
                body: String::new()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn messages_read_like_the_arr_api() {
        assert_eq!(ShimError::NotApplicable(Mode::Sonarr).to_string(), "Not in sonarr mode");
        assert_eq!(
            ShimError::Forward(ForwardError::Upstream {
                status: 500,
                body: "boom".into()
            })
            .to_string(),
            "Overseerr error 500: boom"
        );
    }
}
