use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing_subscriber::{fmt, EnvFilter};

use crate::bridge::IdentifierBridge;
use crate::config::{ProxyConfig, ShimConfig};
use crate::forwarder::RequestForwarder;
use crate::metadata::MetadataClient;

/// Load an env file and initialize structured tracing based on RUST_LOG.
///
/// Env file discovery order:
/// - explicit paths in ENV_FILE, ENVFILE, DOTENV_PATH
/// - `.envfile`
/// - `.env` in the working directory
///
/// Variables already present in the process environment are never overwritten.
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "ENVFILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none"
        && std::path::Path::new(".envfile").is_file()
        && dotenvy::from_filename(".envfile").is_ok()
    {
        env_source = ".envfile".into();
    }

    if env_source == "none" && dotenvy::dotenv().is_ok() {
        env_source = ".env".into();
    }

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Build the outbound HTTP client shared by the Overseerr and TMDb clients.
///
/// Timeouts are applied per call by each collaborator client. A proxy URL that
/// reqwest rejects is logged and skipped.
pub fn build_http_client(proxy: &ProxyConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(format!("arrshim/{}", env!("CARGO_PKG_VERSION")));

    if proxy.disabled {
        builder = builder.no_proxy();
    } else {
        let schemes: [(&Option<String>, fn(&str) -> reqwest::Result<reqwest::Proxy>); 3] = [
            (&proxy.all, |u: &str| reqwest::Proxy::all(u)),
            (&proxy.http, |u: &str| reqwest::Proxy::http(u)),
            (&proxy.https, |u: &str| reqwest::Proxy::https(u)),
        ];
        for (url, make) in schemes {
            let Some(url) = url.as_deref() else { continue };
            match make(url) {
                Ok(p) => builder = builder.proxy(p),
                Err(e) => tracing::warn!(proxy = url, error = %e, "ignoring invalid proxy URL"),
            }
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build HTTP client: {}", e);
        reqwest::Client::new()
    })
}

/// Time-derived ids for the facade create endpoints and add responses.
///
/// Seeded from the Unix clock in seconds; strictly increasing for the process lifetime.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn utc_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Shared application state used by the HTTP server and handlers.
///
/// Everything here is immutable after startup apart from the id counter.
pub struct AppState {
    pub config: ShimConfig,
    pub forwarder: RequestForwarder,
    pub bridge: IdentifierBridge,
    /// `None` when no TMDb key is configured.
    pub metadata: Option<MetadataClient>,
    pub ids: IdGenerator,
}

impl AppState {
    pub fn new(config: ShimConfig) -> Self {
        let http = build_http_client(&config.proxy);
        Self::with_client(config, http)
    }

    /// Build the state around an existing HTTP client.
    pub fn with_client(config: ShimConfig, http: reqwest::Client) -> Self {
        let metadata = MetadataClient::from_config(http.clone(), &config.tmdb);
        let forwarder = RequestForwarder::new(
            http,
            config.overseerr.clone(),
            config.seasons,
            config.dry_run,
        );
        Self {
            bridge: IdentifierBridge::new(metadata.clone()),
            metadata,
            forwarder,
            ids: IdGenerator::default(),
            config,
        }
    }
}

/// Build a JSON error response with the given HTTP status and message.
pub fn error_response(status: StatusCode, msg: &str) -> Response {
    let body = serde_json::json!({ "error": { "message": msg } });
    (status, axum::Json(body)).into_response()
}
