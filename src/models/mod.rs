//! Wire models for the three APIs the shim sits between.
//!
//! - `arr`: shapes returned to the client that believes it is talking to Radarr/Sonarr.
//! - `overseerr`: the canonical request sent to Overseerr.
//! - `tmdb`: the subset of TMDb v3 responses the lookups and the identifier bridge read.

pub mod arr;
pub mod overseerr;
pub mod tmdb;

pub use arr::{
    AddedMedia, ImageRef, ImportSummary, ItemResult, MovieLookup, QualityProfile, RootFolder,
    SeriesLookup, SystemStatus,
};
pub use overseerr::{CanonicalRequest, MediaKind, SeasonSelection};
pub use tmdb::{FindHit, FindResponse, MovieDetails, TvDetails};
