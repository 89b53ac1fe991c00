use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub places: PlacesConfig,

    pub search: SearchConfig,

    pub cache: CacheConfig,

    pub data: DataConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/pizzerias.db".to_string(),
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Public origin used for sitemap and canonical links, without a trailing slash.
    pub base_url: String,

    pub cors_allowed_origins: Vec<String>,

    /// When set, `POST /api/admin/recreate-cache` requires a matching `X-Admin-Token` header.
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_url: "https://pizzerias-argentina.vercel.app".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            admin_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    pub api_url: String,

    pub language_code: String,

    /// Results requested per upstream call (the API caps this at 20).
    pub upstream_page_size: u32,

    pub request_timeout_seconds: u32,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://places.googleapis.com/v1/places:searchText".to_string(),
            language_code: "es".to_string(),
            upstream_page_size: 20,
            request_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Pizzerias per rendered page.
    pub page_size: usize,

    /// Upper bound on upstream pages fetched when assembling a complete result.
    pub max_upstream_pages: u32,

    /// Deadline for `POST /api/search`; 0 disables it.
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_upstream_pages: 3,
            timeout_seconds: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of a single upstream page keyed by its continuation token.
    pub page_ttl_minutes: i64,

    /// Lifetime of an assembled complete result.
    pub complete_ttl_hours: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_ttl_minutes: 60,
            complete_ttl_hours: 24 * 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub primary_dir: String,

    pub fallback_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            primary_dir: "pizzerias".to_string(),
            fallback_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "pizzerias".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            places: PlacesConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
            data: DataConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets and deployment-specific values usually arrive through the environment
    /// (or a `.env` file) rather than the config file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GOOGLE_API_KEY").filter(|v| !v.is_empty()) {
            self.places.api_key = key;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.general.database_path = url;
        }
        if let Some(base) = lookup("BASE_URL").filter(|v| !v.is_empty()) {
            self.server.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(token) = lookup("ADMIN_TOKEN").filter(|v| !v.is_empty()) {
            self.server.admin_token = Some(token);
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("pizzerias").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".pizzerias").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.page_size == 0 {
            anyhow::bail!("search.page_size must be > 0");
        }

        if self.search.max_upstream_pages == 0 {
            anyhow::bail!("search.max_upstream_pages must be > 0");
        }

        if !(1..=20).contains(&self.places.upstream_page_size) {
            anyhow::bail!("places.upstream_page_size must be between 1 and 20");
        }

        if self.cache.page_ttl_minutes <= 0 || self.cache.complete_ttl_hours <= 0 {
            anyhow::bail!("cache lifetimes must be positive");
        }

        Ok(())
    }
}
