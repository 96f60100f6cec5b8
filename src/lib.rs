#![forbid(unsafe_code)]
#![doc = r#"
arrshim

Pretend to be Radarr or Sonarr so that list-automation tools (Kometa and friends) can
"add" movies and series, and turn those adds into Overseerr requests instead.

Crate highlights
- HTTP server (in `server`): the `/api/v3` endpoints a client touches while validating
  and using a Radarr/Sonarr connection, plus `/health`.
- Add/import pipeline: payload normalization, TVDB -> TMDb bridging, Overseerr forwarding.
- Everything is stateless; list endpoints are always empty.

Modules
- `config`: process configuration read once from the environment.
- `normalize`: tolerant extraction of items and identifiers from inbound payloads.
- `metadata` / `bridge`: TMDb client and the TVDB -> TMDb identifier bridge.
- `forwarder`: canonical Overseerr request construction and submission (with dry run).
- `import` / `lookup`: the mutating and lookup endpoints' logic.
- `server`: Axum router, shared-secret gate, and the static facade endpoints.
- `util`: tracing/env initialization, HTTP client, shared state, id generation.
"#]

pub mod bridge;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod import;
pub mod lookup;
pub mod metadata;
pub mod models;
pub mod normalize;
pub mod server;
pub mod util;

pub use crate::config::{Mode, SeasonPolicy, ShimConfig};
pub use crate::error::ShimError;
pub use crate::forwarder::{ForwardError, ForwardOutcome, RequestForwarder};
pub use crate::server::build_router;
pub use crate::util::AppState;
