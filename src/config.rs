use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8088";

/// Which *arr API surface the shim impersonates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Movie manager: `/api/v3/movie*`, TMDb identifiers.
    Radarr,
    /// Series manager: `/api/v3/series*`, TVDB identifiers.
    Sonarr,
}

impl Mode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "radarr" | "movie" | "movies" => Some(Mode::Radarr),
            "sonarr" | "series" | "tv" => Some(Mode::Sonarr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Radarr => "radarr",
            Mode::Sonarr => "sonarr",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default season selection attached to every series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonPolicy {
    All,
    First,
    /// Unrecognised setting: the request carries no seasons field.
    Unspecified,
}

impl SeasonPolicy {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => SeasonPolicy::All,
            "first" => SeasonPolicy::First,
            _ => SeasonPolicy::Unspecified,
        }
    }
}

/// Connection settings for the Overseerr request service.
#[derive(Clone)]
pub struct OverseerrConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_id: i64,
    pub timeout: Duration,
}

impl OverseerrConfig {
    /// Both the base URL and the credential are needed before any call is made.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }
}

/// Connection settings for the TMDb metadata service.
#[derive(Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Outbound proxy settings for the shared HTTP client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// `ARRSHIM_NO_PROXY`: bypass every proxy, including the ones below.
    pub disabled: bool,
    pub all: Option<String>,
    pub http: Option<String>,
    pub https: Option<String>,
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone)]
pub struct ShimConfig {
    pub mode: Mode,
    /// Shared secret expected in `X-Api-Key` or `?apikey=`. Empty disables the check.
    pub api_key: String,
    pub overseerr: OverseerrConfig,
    pub tmdb: TmdbConfig,
    pub seasons: SeasonPolicy,
    pub dry_run: bool,
    pub bind_addr: String,
    pub proxy: ProxyConfig,
}

// Secrets stay out of logs.
impl fmt::Debug for ShimConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShimConfig")
            .field("mode", &self.mode)
            .field("auth_enabled", &!self.api_key.is_empty())
            .field("overseerr_url", &self.overseerr.base_url)
            .field("overseerr_configured", &self.overseerr.is_configured())
            .field("overseerr_user_id", &self.overseerr.user_id)
            .field("tmdb_base_url", &self.tmdb.base_url)
            .field("tmdb_configured", &self.tmdb.is_configured())
            .field("seasons", &self.seasons)
            .field("dry_run", &self.dry_run)
            .field("bind_addr", &self.bind_addr)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl ShimConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode_raw = get("MODE").unwrap_or_else(|| "radarr".into());
        let Some(mode) = Mode::parse(&mode_raw) else {
            bail!("MODE must be one of radarr|sonarr, got '{mode_raw}'");
        };

        let user_id = match get("OVERSEERR_USER_ID") {
            Some(v) => v
                .parse::<i64>()
                .with_context(|| format!("OVERSEERR_USER_ID must be an integer, got '{v}'"))?,
            None => 1,
        };

        let overseerr = OverseerrConfig {
            base_url: get("OVERSEERR_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            api_key: get("OVERSEERR_API_KEY").unwrap_or_default(),
            user_id,
            timeout: seconds(get("OVERSEERR_TIMEOUT_SECONDS"), 30, "OVERSEERR_TIMEOUT_SECONDS")?,
        };

        let tmdb = TmdbConfig {
            base_url: get("TMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            image_base_url: get("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_IMAGE_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            api_key: get("TMDB_API_KEY").unwrap_or_default(),
            timeout: seconds(get("TMDB_TIMEOUT_SECONDS"), 20, "TMDB_TIMEOUT_SECONDS")?,
        };

        let proxy = ProxyConfig {
            disabled: get("ARRSHIM_NO_PROXY").is_some_and(|v| is_truthy(&v)),
            all: get("ARRSHIM_PROXY_URL"),
            http: get("HTTP_PROXY").or_else(|| get("http_proxy")),
            https: get("HTTPS_PROXY").or_else(|| get("https_proxy")),
        };

        Ok(Self {
            mode,
            api_key: get("SHIM_API_KEY").unwrap_or_default(),
            overseerr,
            tmdb,
            seasons: SeasonPolicy::parse(&get("DEFAULT_TV_SEASONS").unwrap_or_else(|| "all".into())),
            dry_run: get("DRY_RUN").map(|v| is_truthy(&v)).unwrap_or(false),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            proxy,
        })
    }
}

/// Truthy flag values: 1, true, yes, on (case-insensitive).
pub fn is_truthy(raw: &str) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    v == "1" || v == "true" || v == "yes" || v == "on"
}

fn seconds(raw: Option<String>, default: u64, key: &str) -> Result<Duration> {
    match raw {
        Some(v) => {
            let n = v
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of seconds, got '{v}'"))?;
            Ok(Duration::from_secs(n))
        }
        None => Ok(Duration::from_secs(default)),
    }
}
