//! Repository configuration (`.girder/config.yaml`).
//!
//! ```yaml
//! graph:
//!   chain-heads: roots
//!   project-scope: any
//! storage:
//!   tasks-file: .girder/tasks.jsonl
//!   dependencies-file: .girder/dependencies.jsonl
//! ```

use crate::domain::{ChainHeads, ProjectScope};
use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Name of the girder directory
pub const GIRDER_DIR_NAME: &str = ".girder";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the task catalog data file
pub const TASKS_FILE_NAME: &str = "tasks.jsonl";

/// Name of the dependency data file
pub const DEPENDENCIES_FILE_NAME: &str = "dependencies.jsonl";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GirderConfig {
    /// Graph behavior
    #[serde(default)]
    pub graph: GraphConfig,

    /// Data file locations
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Graph behavior section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GraphConfig {
    /// Which tasks may head a chain
    #[serde(default)]
    pub chain_heads: ChainHeads,

    /// Which task pairs may be linked
    #[serde(default)]
    pub project_scope: ProjectScope,
}

/// Storage section. Paths are relative to the repository root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Task catalog file
    pub tasks_file: String,

    /// Dependency edge file
    pub dependencies_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_file: format!("{GIRDER_DIR_NAME}/{TASKS_FILE_NAME}"),
            dependencies_file: format!("{GIRDER_DIR_NAME}/{DEPENDENCIES_FILE_NAME}"),
        }
    }
}

impl StorageConfig {
    /// Absolute path of the task catalog file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the path escapes the repository root.
    pub fn tasks_path(&self, root: &Path) -> Result<PathBuf> {
        inside_root(root, "tasks-file", &self.tasks_file)
    }

    /// Storage backend for the dependency file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the path escapes the repository root.
    pub fn to_backend(&self, root: &Path) -> Result<StorageBackend> {
        let path = inside_root(root, "dependencies-file", &self.dependencies_file)?;
        Ok(StorageBackend::Jsonl(path))
    }
}

/// Join `file` onto `root`, rejecting absolute paths and `..` components.
fn inside_root(root: &Path, key: &str, file: &str) -> Result<PathBuf> {
    let relative = Path::new(file);
    let escapes = relative.is_absolute()
        || relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(Error::Config(format!(
            "{key} must stay inside the repository: {file}"
        )));
    }
    Ok(root.join(relative))
}

impl GirderConfig {
    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = GirderConfig::default();
        config.graph.chain_heads = ChainHeads::LinearRuns;
        config.graph.project_scope = ProjectScope::SameProject;
        config.save(&path).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("chain-heads: linear-runs"));
        assert!(written.contains("project-scope: same-project"));
        assert_eq!(GirderConfig::load(&path).await.unwrap(), config);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: GirderConfig = serde_yaml::from_str("graph:\n  chain-heads: roots\n").unwrap();
        assert_eq!(config.graph.project_scope, ProjectScope::Any);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[tokio::test]
    async fn invalid_yaml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "graph: [unclosed").unwrap();

        let err = GirderConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[rstest]
    #[case::absolute("/etc/deps.jsonl")]
    #[case::parent("../deps.jsonl")]
    #[case::nested_parent(".girder/../../deps.jsonl")]
    fn backend_path_must_stay_inside_root(#[case] file: &str) {
        let storage = StorageConfig {
            dependencies_file: file.to_string(),
            ..StorageConfig::default()
        };
        assert!(storage.to_backend(Path::new("/repo")).is_err());
    }

    #[rstest]
    #[case::absolute("/etc/tasks.jsonl")]
    #[case::parent("../tasks.jsonl")]
    #[case::nested_parent(".girder/../../tasks.jsonl")]
    fn tasks_path_must_stay_inside_root(#[case] file: &str) {
        let storage = StorageConfig {
            tasks_file: file.to_string(),
            ..StorageConfig::default()
        };
        let err = storage.tasks_path(Path::new("/repo")).unwrap_err();
        assert!(err.to_string().contains("tasks-file"));
    }

    #[test]
    fn default_tasks_path_is_under_girder_dir() {
        let path = StorageConfig::default()
            .tasks_path(Path::new("/repo"))
            .unwrap();
        assert_eq!(path, Path::new("/repo/.girder/tasks.jsonl"));
    }

    #[test]
    fn default_backend_is_under_girder_dir() {
        let backend = StorageConfig::default()
            .to_backend(Path::new("/repo"))
            .unwrap();
        assert_eq!(
            backend.data_path(),
            Some(Path::new("/repo/.girder/dependencies.jsonl"))
        );
    }
}
