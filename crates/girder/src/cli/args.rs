//! CLI argument structs for all commands.

use clap::{Parser, Subcommand};

use super::types::{ChainHeadsArg, ProjectScopeArg};
use super::validators::{validate_id, validate_name};

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Which tasks may head a chain in `map` output
    #[arg(long, value_enum, default_value = "roots")]
    pub chain_heads: ChainHeadsArg,

    /// Whether dependencies may cross project boundaries
    #[arg(long, value_enum, default_value = "any")]
    pub project_scope: ProjectScopeArg,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `project` command
#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub action: ProjectAction,
}

/// Project management actions
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectAction {
    /// Create a project
    Add {
        /// Project name
        #[arg(value_parser = validate_name)]
        name: String,
    },

    /// List projects
    List,
}

/// Arguments for the `task` command
#[derive(Parser, Debug, Clone)]
pub struct TaskArgs {
    /// Task subcommand
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Task management actions
#[derive(Subcommand, Debug, Clone)]
pub enum TaskAction {
    /// Create a task
    Add {
        /// Owning project id
        #[arg(short, long, value_parser = validate_id)]
        project: i64,

        /// Task title
        #[arg(value_parser = validate_name)]
        title: String,
    },

    /// List tasks
    List {
        /// Only tasks in these projects (comma-separated ids)
        #[arg(short, long, value_delimiter = ',', value_parser = validate_id)]
        project: Vec<i64>,
    },

    /// Delete a task and every dependency touching it
    Delete {
        /// Task id
        #[arg(value_parser = validate_id)]
        id: i64,
    },
}

/// Arguments for the `dep` command
#[derive(Parser, Debug, Clone)]
pub struct DepArgs {
    /// Dependency subcommand
    #[command(subcommand)]
    pub action: DepAction,
}

/// Dependency management actions
#[derive(Subcommand, Debug, Clone)]
pub enum DepAction {
    /// Add a dependency
    Add {
        /// Task that has to wait
        #[arg(value_parser = validate_id)]
        dependent: i64,

        /// Task it waits on
        #[arg(value_parser = validate_id)]
        depends_on: i64,
    },

    /// Remove a dependency by edge id
    Remove {
        /// Edge id
        #[arg(value_parser = validate_id)]
        id: i64,
    },

    /// List dependencies
    List {
        /// Only dependencies between tasks of these projects (comma-separated ids)
        #[arg(short, long, value_delimiter = ',', value_parser = validate_id)]
        project: Vec<i64>,
    },

    /// Check whether a dependency would close a cycle, without adding it
    Check {
        /// Task that would wait
        #[arg(value_parser = validate_id)]
        dependent: i64,

        /// Task it would wait on
        #[arg(value_parser = validate_id)]
        depends_on: i64,
    },
}

/// Arguments for the `map` command
#[derive(Parser, Debug, Clone, Default)]
pub struct MapArgs {
    /// Only tasks of these projects (comma-separated ids)
    #[arg(short, long, value_delimiter = ',', value_parser = validate_id)]
    pub project: Vec<i64>,
}
