use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `catalog.base_url`
pub const CATALOG_URL_ENV: &str = "MOVIESHELF_CATALOG_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Keep records the catalog flags as adult content
    #[serde(default)]
    pub include_adult: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// How many of the user's most frequent genres seed the candidate fetch
    #[serde(default = "default_top_genres")]
    pub top_genres: usize,
    #[serde(default = "default_recommendation_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
    /// Number of rotated log files to keep
    #[serde(default = "default_log_retention")]
    pub retention: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for where watchlist, favorites and settings are persisted
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_user_agent() -> String {
    format!("movieshelf/{}", env!("CARGO_PKG_VERSION"))
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_top_genres() -> usize {
    5
}

fn default_recommendation_limit() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

fn default_log_retention() -> usize {
    5
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            include_adult: false,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            top_genres: default_top_genres(),
            limit: default_recommendation_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
            retention: default_log_retention(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults.
    /// Environment overrides apply either way.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.override_catalog_url(std::env::var(CATALOG_URL_ENV).ok().as_deref());
    }

    /// Replace `catalog.base_url` with a non-blank override
    fn override_catalog_url(&mut self, url: Option<&str>) {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            self.catalog.base_url = url.to_string();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let base_url = self.catalog.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "catalog.base_url must be an http(s) URL, got: {}",
                self.catalog.base_url
            ));
        }

        if self.search.min_query_len == 0 {
            return Err(anyhow::anyhow!("search.min_query_len must be at least 1"));
        }

        if self.recommendations.top_genres == 0 {
            return Err(anyhow::anyhow!("recommendations.top_genres must be at least 1"));
        }

        if self.recommendations.limit == 0 {
            return Err(anyhow::anyhow!("recommendations.limit must be at least 1"));
        }

        Ok(())
    }
}
