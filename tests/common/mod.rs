#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arrshim::{build_router, AppState, ShimConfig};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How the stub Overseerr/TMDb upstream answers.
#[derive(Clone)]
pub struct StubBehavior {
    pub request_status: StatusCode,
    pub request_body: String,
    /// tvdb id -> tmdb id answers for `/3/find/{id}`.
    pub find: HashMap<i64, i64>,
    /// Forces a status on `/3/find/{id}` (e.g. 500) instead of answering.
    pub find_status: Option<StatusCode>,
    pub movies: HashMap<i64, Value>,
    pub shows: HashMap<i64, Value>,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            request_status: StatusCode::CREATED,
            request_body: r#"{"id":99,"status":1}"#.to_string(),
            find: HashMap::new(),
            find_status: None,
            movies: HashMap::new(),
            shows: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    behavior: StubBehavior,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    tmdb_calls: Arc<Mutex<Vec<String>>>,
}

/// Recording stand-in for both Overseerr (`/api/v1/request`) and TMDb (`/3/...`).
pub struct UpstreamStub {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    tmdb_calls: Arc<Mutex<Vec<String>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl UpstreamStub {
    pub async fn start(behavior: StubBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let tmdb_calls = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            behavior,
            requests: requests.clone(),
            tmdb_calls: tmdb_calls.clone(),
        });

        let router = Router::new()
            .route("/api/v1/request", post(request_handler))
            .route("/3/find/:id", get(find_handler))
            .route("/3/movie/:id", get(movie_handler))
            .route("/3/tv/:id", get(tv_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind upstream stub");
        let addr = listener.local_addr().expect("stub local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Upstream stub error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        UpstreamStub {
            base_url: format!("http://{}", addr),
            requests,
            tmdb_calls,
            shutdown: Some(tx),
        }
    }

    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    /// Bodies received on `/api/v1/request`, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock requests").clone()
    }

    /// `path?api_key=...` of every TMDb call, in arrival order.
    pub fn tmdb_calls(&self) -> Vec<String> {
        self.tmdb_calls.lock().expect("lock tmdb calls").clone()
    }
}

impl Drop for UpstreamStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn request_handler(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .expect("lock requests")
        .push(RecordedRequest { api_key, body });
    (
        state.behavior.request_status,
        [("content-type", "application/json")],
        state.behavior.request_body.clone(),
    )
        .into_response()
}

fn record_tmdb(state: &StubState, path: String, q: &HashMap<String, String>) {
    let key = q.get("api_key").cloned().unwrap_or_default();
    state
        .tmdb_calls
        .lock()
        .expect("lock tmdb calls")
        .push(format!("{path}?api_key={key}"));
}

async fn find_handler(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    record_tmdb(&state, format!("/3/find/{id}"), &q);
    if let Some(status) = state.behavior.find_status {
        return (status, "stub failure").into_response();
    }
    assert_eq!(q.get("external_source").map(String::as_str), Some("tvdb_id"));
    let tv_results: Vec<Value> = state
        .behavior
        .find
        .get(&id)
        .map(|tmdb| vec![serde_json::json!({"id": tmdb, "name": "stub"})])
        .unwrap_or_default();
    Json(serde_json::json!({"movie_results": [], "tv_results": tv_results})).into_response()
}

async fn movie_handler(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    record_tmdb(&state, format!("/3/movie/{id}"), &q);
    match state.behavior.movies.get(&id) {
        Some(m) => Json(m.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"status_code": 34}))).into_response(),
    }
}

async fn tv_handler(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    record_tmdb(&state, format!("/3/tv/{id}"), &q);
    match state.behavior.shows.get(&id) {
        Some(s) => Json(s.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({"status_code": 34}))).into_response(),
    }
}

/// Build a config from `(key, value)` pairs without touching the process environment.
pub fn config_from(pairs: &[(&str, &str)]) -> ShimConfig {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ShimConfig::from_lookup(|k| map.get(k).cloned()).expect("valid test config")
}

/// Config pointing both collaborators at `stub`, plus any overrides.
pub fn stub_config(stub: &UpstreamStub, mode: &str, extra: &[(&str, &str)]) -> ShimConfig {
    let overseerr = stub.url();
    let tmdb = format!("{}/3", stub.url());
    let mut pairs: Vec<(&str, &str)> = vec![
        ("MODE", mode),
        ("OVERSEERR_URL", overseerr.as_str()),
        ("OVERSEERR_API_KEY", "ov-key"),
        ("OVERSEERR_USER_ID", "3"),
        ("TMDB_API_KEY", "tmdb-key"),
        ("TMDB_BASE_URL", tmdb.as_str()),
    ];
    pairs.extend_from_slice(extra);
    config_from(&pairs)
}

/// The shim router bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub addr: SocketAddr,
    join: JoinHandle<()>,
    client: reqwest::Client,
}

impl TestServer {
    fn make_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed building reqwest client")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn get_with_key(&self, path: &str, key: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("X-Api-Key", key)
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("POST request")
    }

    /// POST raw bytes with no content type, as some clients do.
    pub async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .body(body)
            .send()
            .await
            .expect("POST request")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.join.abort();
    }
}

pub async fn spawn_app(config: ShimConfig) -> TestServer {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("outbound client");
    let app = build_router(AppState::with_client(config, http));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}", addr);
    let server = axum::serve(listener, app.into_make_service());

    let join = tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Test server error: {e:?}");
        }
    });

    TestServer {
        base_url,
        addr,
        join,
        client: TestServer::make_client(),
    }
}
