use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("MOVIESHELF_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

/// On-disk locations for configuration, persisted user state and logs
#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("movieshelf");

        Ok(Self::from_base(base_dir))
    }

    /// Lay out every directory under a single root (tests, portable installs)
    pub fn from_base(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
            log_dir: base_dir.join("logs"),
        }
    }

    pub fn from_container_env() -> Self {
        Self::from_base(container_base_path())
    }

    /// Replace the data directory, keeping config and log locations
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// File backing one persisted storage key
    pub fn storage_file(&self, key: &str) -> PathBuf {
        storage_file_in(&self.data_dir, key)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.storage_file(crate::settings::SETTINGS_KEY)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("movieshelf.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // A pre-created container base directory means we're running in a container
        let base = container_base_path();
        if base.exists() {
            return Self::from_container_env();
        }

        // Otherwise, use platform-specific paths (e.g., ~/.config/movieshelf on Linux)
        Self::new().unwrap_or_else(|_| Self::from_container_env())
    }
}

/// `<data_dir>/<key>.json`, the file backing one storage key
pub fn storage_file_in(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{}.json", key))
}

/// Replace `path` in one step: write a sibling temp file, then rename over the target.
/// Readers see either the old content or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);
    std::fs::write(&temp_path, contents)?;
    std::fs::rename(&temp_path, path)
}
