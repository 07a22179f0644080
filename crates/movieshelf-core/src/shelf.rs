use anyhow::{Context, Result};
use movieshelf_catalog::{CatalogClient, MovieCatalog};
use movieshelf_config::{Config, PathManager, SettingsStore};
use std::sync::Arc;
use tracing::info;

use crate::membership::ListMembership;
use crate::recommendations::RecommendationEngine;
use crate::search::SearchDebouncer;
use crate::store::CollectionStore;

/// Every service of the app, wired against one data directory and one catalog
pub struct MovieShelf {
    paths: PathManager,
    catalog: Arc<dyn MovieCatalog>,
    lists: ListMembership,
    settings: SettingsStore,
    recommendations: RecommendationEngine,
    search: SearchDebouncer,
}

impl MovieShelf {
    /// Validate `config` and connect to the HTTP catalog it names
    pub fn open(config: &Config, paths: PathManager) -> Result<Self> {
        config.validate()?;
        let catalog = CatalogClient::from_config(&config.catalog)
            .context("Failed to create catalog client")?;
        info!("Using catalog at {}", catalog.base_url());
        Self::with_catalog(config, paths, Arc::new(catalog))
    }

    pub fn with_catalog(
        config: &Config,
        paths: PathManager,
        catalog: Arc<dyn MovieCatalog>,
    ) -> Result<Self> {
        let paths = match &config.storage.data_dir {
            Some(dir) => paths.with_data_dir(dir),
            None => paths,
        };
        std::fs::create_dir_all(paths.data_dir())
            .with_context(|| format!("Failed to create data directory {:?}", paths.data_dir()))?;

        let store = CollectionStore::from_paths(&paths);
        let settings = SettingsStore::open(paths.settings_file());
        let recommendations = RecommendationEngine::with_config(
            catalog.clone(),
            store.clone(),
            &config.recommendations,
        );
        let search = SearchDebouncer::new(catalog.clone(), &config.search);

        Ok(Self {
            paths,
            catalog,
            lists: ListMembership::new(store),
            settings,
            recommendations,
            search,
        })
    }

    pub fn paths(&self) -> &PathManager {
        &self.paths
    }

    pub fn catalog(&self) -> &dyn MovieCatalog {
        self.catalog.as_ref()
    }

    pub fn lists(&self) -> &ListMembership {
        &self.lists
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn recommendations(&self) -> &RecommendationEngine {
        &self.recommendations
    }

    pub fn search(&self) -> &SearchDebouncer {
        &self.search
    }

    /// Empty both collections and restore default settings
    pub fn clear_app_data(&self) -> Result<()> {
        let cleared = self.lists.clear_all();
        self.settings.reset()?;
        cleared?;
        info!("App data cleared");
        Ok(())
    }
}
