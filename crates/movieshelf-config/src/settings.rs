use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::paths::write_atomic;

/// Storage key the settings record is persisted under
pub const SETTINGS_KEY: &str = "userSettings";

/// Language codes offered by the settings screen
pub const AVAILABLE_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("hi", "हिंदी (Hindi)"),
    ("pa", "ਪੰਜਾਬੀ (Punjabi)"),
    ("hinglish", "Hinglish"),
    ("ar", "العربية (Arabic)"),
];

/// Genres the user can pin as favorites
pub const AVAILABLE_GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Thriller",
    "Western",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// View shown when the app starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LandingView {
    #[default]
    Trending,
    Recommended,
    Watchlist,
    Discover,
}

/// User preferences. Unknown keys are carried through untouched in `extra`.
///
/// A stored value that doesn't fit its field falls back to that field's
/// default; the rest of the record still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    #[serde(deserialize_with = "or_default")]
    pub theme: Theme,
    #[serde(deserialize_with = "or_default_language")]
    pub language: String,
    #[serde(deserialize_with = "or_default")]
    pub favorite_genres: Vec<String>,
    #[serde(deserialize_with = "or_default")]
    pub content_filter: bool,
    #[serde(deserialize_with = "or_default_true")]
    pub auto_play_trailers: bool,
    #[serde(deserialize_with = "or_default")]
    pub data_saver_mode: bool,
    #[serde(deserialize_with = "or_default")]
    pub high_contrast: bool,
    #[serde(deserialize_with = "or_default")]
    pub default_home_page: LandingView,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: "en".to_string(),
            favorite_genres: Vec::new(),
            content_filter: false,
            auto_play_trailers: true,
            data_saver_mode: false,
            high_contrast: false,
            default_home_page: LandingView::Trending,
            extra: Map::new(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Ignoring unusable settings value {}: {}", value, e);
            Ok(None)
        }
    }
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn or_default_language<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient(deserializer)?.unwrap_or_else(|| UserSettings::default().language))
}

fn or_default_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(lenient(deserializer)?.unwrap_or(true))
}

/// Partial update for [`UserSettings`]; only the fields that are `Some` are applied.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_play_trailers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_saver_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_home_page: Option<LandingView>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserSettings {
    /// Shallow merge: every field present in the patch replaces the current value
    pub fn merged(&self, patch: SettingsPatch) -> UserSettings {
        let mut next = self.clone();
        if let Some(theme) = patch.theme {
            next.theme = theme;
        }
        if let Some(language) = patch.language {
            next.language = language;
        }
        if let Some(genres) = patch.favorite_genres {
            next.favorite_genres = genres;
        }
        if let Some(flag) = patch.content_filter {
            next.content_filter = flag;
        }
        if let Some(flag) = patch.auto_play_trailers {
            next.auto_play_trailers = flag;
        }
        if let Some(flag) = patch.data_saver_mode {
            next.data_saver_mode = flag;
        }
        if let Some(flag) = patch.high_contrast {
            next.high_contrast = flag;
        }
        if let Some(view) = patch.default_home_page {
            next.default_home_page = view;
        }
        next.extra.extend(patch.extra);
        next
    }
}

/// Owner of the persisted [`UserSettings`] singleton.
///
/// Every mutation is written to disk before observers are notified, so a
/// subscriber never sees a value that was not persisted.
pub struct SettingsStore {
    path: PathBuf,
    state: watch::Sender<UserSettings>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Open the store, reading persisted settings or falling back to defaults
    pub fn open(path: PathBuf) -> Self {
        let settings = load_settings(&path);
        let (state, _) = watch::channel(settings);
        Self {
            path,
            state,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> UserSettings {
        self.state.borrow().clone()
    }

    /// Merge `patch` into the current settings, persist, then notify observers
    pub fn update(&self, patch: SettingsPatch) -> Result<UserSettings> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let next = self.state.borrow().merged(patch);
        self.persist(&next)?;
        self.state.send_replace(next.clone());
        debug!("Settings updated and saved to {:?}", self.path);
        Ok(next)
    }

    /// Restore defaults and persist them
    pub fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let defaults = UserSettings::default();
        self.persist(&defaults)?;
        self.state.send_replace(defaults);
        debug!("Settings reset to defaults");
        Ok(())
    }

    /// Receive every settings value published after this call
    pub fn subscribe(&self) -> watch::Receiver<UserSettings> {
        self.state.subscribe()
    }

    fn persist(&self, settings: &UserSettings) -> Result<()> {
        let content = serde_json::to_vec(settings)?;
        write_atomic(&self.path, &content)?;
        Ok(())
    }
}

fn load_settings(path: &Path) -> UserSettings {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No saved settings at {:?}, using defaults", path);
            return UserSettings::default();
        }
        Err(e) => {
            warn!("Failed to read settings file {:?}: {}. Using defaults.", path, e);
            return UserSettings::default();
        }
    };

    match serde_json::from_str::<UserSettings>(&content) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "Settings corruption detected in {:?}: {}. Deleting corrupted file.",
                path, e
            );
            if let Err(rm_err) = std::fs::remove_file(path) {
                warn!("Failed to delete corrupted settings file: {}", rm_err);
            }
            UserSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::open(dir.path().join("userSettings.json"))
    }

    #[test]
    fn test_defaults_on_first_use() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let settings = store.get();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, "en");
        assert!(settings.auto_play_trailers);
        assert_eq!(settings.default_home_page, LandingView::Trending);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_update_merges_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .update(SettingsPatch {
                theme: Some(Theme::Light),
                favorite_genres: Some(vec!["Drama".to_string()]),
                ..SettingsPatch::default()
            })
            .unwrap();
        store
            .update(SettingsPatch {
                high_contrast: Some(true),
                ..SettingsPatch::default()
            })
            .unwrap();

        let reopened = store_in(&dir).get();
        assert_eq!(reopened.theme, Theme::Light);
        assert_eq!(reopened.favorite_genres, vec!["Drama"]);
        assert!(reopened.high_contrast);
        assert_eq!(reopened.language, "en");
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let patch: SettingsPatch = serde_json::from_value(json!({
            "language": "fr",
            "gridDensity": "compact"
        }))
        .unwrap();
        store.update(patch).unwrap();

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["language"], "fr");
        assert_eq!(raw["gridDensity"], "compact");
        assert_eq!(raw["autoPlayTrailers"], true);

        let reopened = store_in(&dir).get();
        assert_eq!(reopened.extra.get("gridDensity"), Some(&json!("compact")));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .update(SettingsPatch {
                data_saver_mode: Some(true),
                ..SettingsPatch::default()
            })
            .unwrap();

        store.reset().unwrap();
        assert_eq!(store.get(), UserSettings::default());
        assert_eq!(store_in(&dir).get(), UserSettings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userSettings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::open(path.clone());
        assert_eq!(store.get(), UserSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_unknown_field_value_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userSettings.json");
        std::fs::write(
            &path,
            r#"{"theme":"light","language":"fr","defaultHomePage":"search","autoPlayTrailers":"yes","gridDensity":"compact"}"#,
        )
        .unwrap();

        let settings = SettingsStore::open(path.clone()).get();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.language, "fr");
        assert_eq!(settings.default_home_page, LandingView::Trending);
        assert!(settings.auto_play_trailers);
        assert_eq!(settings.extra.get("gridDensity"), Some(&json!("compact")));
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userSettings.json");
        std::fs::write(&path, r#"{"theme":"light"}"#).unwrap();

        let settings = SettingsStore::open(path).get();
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.auto_play_trailers);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_subscribers_see_updates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut rx = store.subscribe();

        store
            .update(SettingsPatch {
                language: Some("es".to_string()),
                ..SettingsPatch::default()
            })
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().language, "es");
    }
}
