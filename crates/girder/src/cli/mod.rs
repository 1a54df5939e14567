//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Initialize a new girder repository
//! - `project`: Add or list projects
//! - `task`: Add, list or delete tasks
//! - `dep`: Add, remove, list or check dependencies
//! - `map`: Show dependencies with their chains and convergences
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! girder project add "Website"
//! girder task add --project 1 "Design"
//! girder task add --project 1 "Build"
//! girder dep add 2 1
//! girder map
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    DepAction, DepArgs, InitArgs, MapArgs, ProjectAction, ProjectArgs, TaskAction, TaskArgs,
};
pub use types::{ChainHeadsArg, ProjectScopeArg};
pub use validators::{validate_id, validate_name};

/// Girder - task dependencies across projects
///
/// Tracks which tasks wait on which, keeps the graph free of cycles, and
/// shows the chains and convergences it contains. Data lives in `.girder/`.
#[derive(Parser, Debug)]
#[command(name = "girder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new girder repository
    ///
    /// Creates the `.girder/` directory with configuration and empty data files.
    Init(InitArgs),

    /// Manage projects
    Project(ProjectArgs),

    /// Manage tasks
    ///
    /// Deleting a task also removes every dependency that references it.
    Task(TaskArgs),

    /// Manage dependencies between tasks
    ///
    /// A dependency says the dependent task cannot start before the task it
    /// depends on is done. Self dependencies, duplicates and cycles are rejected.
    Dep(DepArgs),

    /// Show dependencies, chains and convergences
    Map(MapArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns any error raised by the command.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Project(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_project(&app, args, output_mode).await
            }
            Some(Commands::Task(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_task(&app, args, output_mode).await
            }
            Some(Commands::Dep(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dep(&app, args, output_mode).await
            }
            Some(Commands::Map(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_map(&app, args, output_mode).await
            }
            None => {
                println!("girder {}", env!("CARGO_PKG_VERSION"));
                println!("Run 'girder --help' for usage information");
                Ok(())
            }
        }
    }
}
