//! Application context for CLI command execution.
//!
//! # Example
//!
//! ```no_run
//! use girder::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let snapshot = app.service().snapshot(None).await?;
//!     println!("{} dependencies", snapshot.edges.len());
//!     Ok(())
//! }
//! ```

use crate::api::DependencyService;
use crate::catalog::{InMemoryCatalog, TaskCatalog, TaskDeletionListener};
use crate::commands::init::find_girder_root;
use crate::config::{GirderConfig, CONFIG_FILE_NAME, GIRDER_DIR_NAME};
use crate::error::{Error, Result};
use crate::storage::{create_store, DependencyStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded repository: catalog, dependency store, and the service over them.
///
/// The store is subscribed to the catalog's deletion events, so deleting a
/// task through [`App::catalog`] also drops its edges.
pub struct App {
    catalog: Arc<InMemoryCatalog>,
    store: Arc<dyn DependencyStore>,
    service: DependencyService,
    config: GirderConfig,
    root_dir: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root_dir", &self.root_dir)
            .field("config", &self.config)
            .field("store", &"<dyn DependencyStore>")
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Searches up the directory tree for `.girder/`, loads configuration,
    /// the task catalog and the dependency graph. Skipped records are logged
    /// as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No girder repository is found in the directory tree
    /// - Configuration cannot be loaded
    /// - A data file exists but cannot be read
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_girder_root(working_dir).ok_or_else(|| {
            Error::Config(format!(
                "Not a girder repository (no {GIRDER_DIR_NAME} found). Run 'girder init' first"
            ))
        })?;

        let config_path = root_dir.join(GIRDER_DIR_NAME).join(CONFIG_FILE_NAME);
        let config = GirderConfig::load(&config_path).await?;

        let tasks_path = config.storage.tasks_path(&root_dir)?;
        let (catalog, warnings) = InMemoryCatalog::load_from_jsonl(&tasks_path).await?;
        for warning in &warnings {
            tracing::warn!(path = %tasks_path.display(), ?warning, "skipped catalog record");
        }
        let catalog = Arc::new(catalog);

        let backend = config.storage.to_backend(&root_dir)?;
        let as_catalog: Arc<dyn TaskCatalog> = catalog.clone();
        let (store, _warnings) =
            create_store(backend, as_catalog.clone(), config.graph.project_scope).await?;

        let listener: Arc<dyn TaskDeletionListener> = store.clone();
        catalog.subscribe(Arc::downgrade(&listener)).await;

        let service = DependencyService::new(store.clone(), as_catalog)
            .with_chain_heads(config.graph.chain_heads);

        Ok(Self {
            catalog,
            store,
            service,
            config,
            root_dir,
        })
    }

    /// The task catalog.
    #[must_use]
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// The dependency store.
    #[must_use]
    pub fn store(&self) -> &dyn DependencyStore {
        self.store.as_ref()
    }

    /// The dependency service.
    #[must_use]
    pub fn service(&self) -> &DependencyService {
        &self.service
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &GirderConfig {
        &self.config
    }

    /// The directory containing `.girder/`.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Persist the catalog and the dependency graph.
    ///
    /// If writing the graph fails, the store is reloaded from disk so the
    /// in-memory state matches what is persisted.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    pub async fn save(&self) -> Result<()> {
        self.catalog.save().await?;
        if let Err(err) = self.store.save().await {
            if let Err(reload_err) = self.store.reload().await {
                tracing::warn!(error = %reload_err, "failed to reload after save error");
            }
            return Err(err);
        }
        Ok(())
    }
}
