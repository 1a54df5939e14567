//! Implementation of the `init` command.
//!
//! Creates the `.girder/` directory with a configuration file and empty data
//! files for the task catalog and the dependency graph.

use crate::config::{
    GirderConfig, GraphConfig, CONFIG_FILE_NAME, DEPENDENCIES_FILE_NAME, GIRDER_DIR_NAME,
    TASKS_FILE_NAME,
};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the gitignore file within .girder
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum directory depth to traverse when searching for the girder root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Paths created by [`init`].
#[derive(Debug)]
pub struct InitResult {
    /// The `.girder` directory
    pub girder_dir: PathBuf,
    /// The config file
    pub config_file: PathBuf,
    /// The task catalog file
    pub tasks_file: PathBuf,
    /// The dependency file
    pub dependencies_file: PathBuf,
    /// The gitignore file
    pub gitignore_file: PathBuf,
}

/// Initialize a new girder repository in `base_dir`.
///
/// # Errors
///
/// Returns an error if `.girder/` already exists or a file cannot be written.
pub async fn init(base_dir: &Path, graph: GraphConfig) -> Result<InitResult> {
    let girder_dir = base_dir.join(GIRDER_DIR_NAME);

    if girder_dir.exists() {
        return Err(Error::Config(format!(
            "Girder is already initialized in this directory. Found existing '{GIRDER_DIR_NAME}'"
        )));
    }

    fs::create_dir_all(&girder_dir).await?;

    let config_file = girder_dir.join(CONFIG_FILE_NAME);
    let config = GirderConfig {
        graph,
        ..GirderConfig::default()
    };
    config.save(&config_file).await?;

    let tasks_file = girder_dir.join(TASKS_FILE_NAME);
    fs::write(&tasks_file, "").await?;

    let dependencies_file = girder_dir.join(DEPENDENCIES_FILE_NAME);
    fs::write(&dependencies_file, "").await?;

    let gitignore_file = girder_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Temporary files left behind by interrupted saves
*.tmp
";
    fs::write(&gitignore_file, gitignore_content).await?;

    tracing::info!(path = %girder_dir.display(), "initialized girder repository");

    Ok(InitResult {
        girder_dir,
        config_file,
        tasks_file,
        dependencies_file,
        gitignore_file,
    })
}

/// Find the girder root directory by searching up the directory tree.
///
/// Returns the directory containing `.girder/`, or `None` if none is found
/// within [`MAX_TRAVERSAL_DEPTH`] levels.
#[must_use]
pub fn find_girder_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(GIRDER_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
