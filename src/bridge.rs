//! TVDB -> TMDb identifier bridge.
//!
//! Sonarr clients speak TVDB ids while Overseerr only accepts TMDb ids. Every
//! resolution is a single fresh `find` call; nothing is cached.

use tracing::debug;

use crate::metadata::{MetadataClient, MetadataError};

#[derive(Clone)]
pub struct IdentifierBridge {
    metadata: Option<MetadataClient>,
}

impl IdentifierBridge {
    pub fn new(metadata: Option<MetadataClient>) -> Self {
        Self { metadata }
    }

    pub fn is_enabled(&self) -> bool {
        self.metadata.is_some()
    }

    /// Resolve a TVDB series id to its TMDb id.
    ///
    /// `Ok(None)` means "no mapping": TMDb has no match, answered 404, or the
    /// bridge is disabled because no TMDb key is configured. Other status codes
    /// and transport failures are returned as errors.
    pub async fn resolve(&self, tvdb_id: i64) -> Result<Option<i64>, MetadataError> {
        let Some(metadata) = &self.metadata else {
            debug!(tvdb_id, "identifier bridge disabled; no TMDb key");
            return Ok(None);
        };

        let found = match metadata.find_by_tvdb_id(tvdb_id).await {
            Ok(found) => found,
            Err(MetadataError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        let tmdb_id = found.tv_results.first().map(|hit| hit.id);
        debug!(tvdb_id, ?tmdb_id, "resolved tvdb id");
        Ok(tmdb_id)
    }
}
