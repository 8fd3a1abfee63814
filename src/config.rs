use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub staticdir: Option<String>,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "baseurl", default = "default_base_url")]
    pub base_url: String,
    #[serde(alias = "imagebaseurl", default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(alias = "apikey", default)]
    pub api_key: Option<String>,
    #[serde(alias = "pagesize", default = "default_page_size")]
    pub page_size: u32,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewsConfig {
    /// Distance from the bottom of the page, in CSS pixels, at which the
    /// next page is requested.
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: f64,
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Live views kept at most; the least recently active go first.
    #[serde(default = "default_max_views")]
    pub max_views: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: default_scroll_threshold(),
            idle_ttl_secs: default_idle_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            max_views: default_max_views(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
        }
    }
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_scroll_threshold() -> f64 {
    100.0
}

fn default_idle_ttl() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_views() -> usize {
    10_000
}

fn default_cache_entries() -> u64 {
    1000
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    pub fn from_yaml(origin: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(origin.to_string(), e))?;

        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(origin.to_string(), msg.to_string()));

        if self.views.sweep_interval_secs == 0 {
            return invalid("views.sweep_interval_secs must be at least 1");
        }
        if self.views.max_views == 0 {
            return invalid("views.max_views must be at least 1");
        }
        if self.tmdb.page_size == 0 {
            return invalid("tmdb.page_size must be at least 1");
        }
        Ok(())
    }

    /// The configured API key, falling back to `TMDB_API_KEY`.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or(&self, env_key: Option<String>) -> Result<String, ConfigError> {
        self.tmdb
            .api_key
            .clone()
            .or(env_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid config file {0}: {1}")]
    Invalid(String, String),
    #[error("No TMDB API key configured (set tmdb.api_key or {})", API_KEY_ENV)]
    MissingApiKey,
}
