use serde::Deserialize;

use crate::fs::SearchOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub max_entries: usize,
    pub default_limit: usize,
    pub follow_symlinks: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    /// Allow any origin; the desktop webview does not serve from our origin.
    pub cors_permissive: Option<bool>,
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub security: Option<SecurityConfig>,
    pub rate_limit: RateLimitConfig,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
        {
            Ok(app_cfg) => app_cfg,
            Err(e) => {
                eprintln!("FATAL: Failed to load embedded default config: {}", e);
                panic!("Failed to load embedded default config: {}", e);
            }
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self { max_entries: 10_000, default_limit: 20, follow_symlinks: false }
    }
}

impl SearchConfig {
    /// Search options for one request. `limit` falls back to `default_limit`.
    pub fn options(&self, limit: Option<usize>) -> SearchOptions {
        SearchOptions {
            limit: limit.unwrap_or(self.default_limit),
            max_entries: self.max_entries,
            follow_symlinks: self.follow_symlinks,
        }
    }
}

impl AppConfig {
    pub fn cors_permissive(&self) -> bool {
        self.security.as_ref().and_then(|s| s.cors_permissive).unwrap_or(true)
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: explorer.toml (in CWD)
        .add_source(::config::File::with_name("explorer").required(false));

    if let Ok(custom_path) = std::env::var("EXPLORER_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("EXPLORER").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Search
    if cfg.search.max_entries == 0 || cfg.search.max_entries > 1_000_000 {
        return Err(anyhow::anyhow!("search.max_entries must be in 1..=1000000"));
    }
    if !(1..=crate::fs::search::MAX_LIMIT).contains(&cfg.search.default_limit) {
        return Err(anyhow::anyhow!("search.default_limit must be in 1..=100"));
    }

    // Rate limit
    if cfg.rate_limit.max_requests == 0 {
        return Err(anyhow::anyhow!("rate_limit.max_requests must be > 0"));
    }
    if cfg.rate_limit.window_seconds == 0 {
        return Err(anyhow::anyhow!("rate_limit.window_seconds must be > 0"));
    }

    Ok(())
}
