pub mod config;
pub mod paths;
pub mod settings;

pub use config::{
    CatalogConfig, Config, LoggingConfig, RecommendationConfig, SearchConfig, StorageConfig,
    CATALOG_URL_ENV,
};
pub use paths::{container_base_path, storage_file_in, write_atomic, PathManager};
pub use settings::{
    LandingView, SettingsPatch, SettingsStore, Theme, UserSettings, AVAILABLE_GENRES,
    AVAILABLE_LANGUAGES, SETTINGS_KEY,
};
