//! Command execution for each CLI subcommand.

use anyhow::Result;
use std::collections::HashSet;

use super::args::{
    DepAction, DepArgs, InitArgs, MapArgs, ProjectAction, ProjectArgs, TaskAction, TaskArgs,
};
use crate::app::App;
use crate::config::GraphConfig;
use crate::domain::{EdgeId, ProjectId, TaskId};
use crate::output::{self, OutputConfig, OutputMode};

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let graph = GraphConfig {
        chain_heads: args.chain_heads.into(),
        project_scope: args.project_scope.into(),
    };

    let result = init::init(&current_dir, graph).await?;

    if !args.quiet {
        println!("Initialized girder in {}", result.girder_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Tasks: {}", result.tasks_file.display());
        println!("  Dependencies: {}", result.dependencies_file.display());
        println!("  Chain heads: {}", graph.chain_heads);
    }

    Ok(())
}

/// Execute the project command
pub async fn execute_project(app: &App, args: &ProjectArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        ProjectAction::Add { name } => {
            let project = app.catalog().add_project(name).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&project)?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    println!(
                        "{} project #{}: {}",
                        output::success("Created", &config),
                        project.id,
                        project.name
                    );
                }
            }
        }
        ProjectAction::List => {
            let projects = app.catalog().projects().await;
            output::print_projects(&projects, output_mode)?;
        }
    }
    Ok(())
}

/// Execute the task command
pub async fn execute_task(app: &App, args: &TaskArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        TaskAction::Add { project, title } => {
            let task = app.catalog().add_task(ProjectId(*project), title).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&task)?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    println!(
                        "{} task #{}: {}",
                        output::success("Created", &config),
                        task.id,
                        task.title
                    );
                }
            }
        }
        TaskAction::List { project } => {
            let mut tasks = app.catalog().tasks().await;
            if !project.is_empty() {
                tasks.retain(|t| project.contains(&t.project_id.get()));
            }
            output::print_tasks(&tasks, output_mode)?;
        }
        TaskAction::Delete { id } => {
            let dropped = app.catalog().delete_task(TaskId(*id)).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "action": "delete",
                    "task": id,
                    "dependencies_removed": dropped,
                    "status": "success"
                }))?,
                OutputMode::Text => {
                    println!("Deleted task #{id} ({dropped} dependencies removed)");
                }
            }
        }
    }
    Ok(())
}

/// Execute the dep command
pub async fn execute_dep(app: &App, args: &DepArgs, output_mode: OutputMode) -> Result<()> {
    match &args.action {
        DepAction::Add {
            dependent,
            depends_on,
        } => {
            let edge = app
                .service()
                .create_dependency(TaskId(*dependent), TaskId(*depends_on))
                .await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&edge)?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    println!(
                        "{} dependency [{}]: #{} waits on #{}",
                        output::success("Added", &config),
                        edge.id,
                        edge.dependent_task_id,
                        edge.depends_on_task_id
                    );
                }
            }
        }
        DepAction::Remove { id } => {
            app.service().delete_dependency(EdgeId(*id)).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "action": "remove",
                    "id": id,
                    "status": "success"
                }))?,
                OutputMode::Text => println!("Removed dependency [{id}]"),
            }
        }
        DepAction::List { project } => {
            let visible = visible_tasks(app, project).await;
            let snapshot = app.service().snapshot(visible.as_ref()).await?;
            output::print_edges(&snapshot.edges, output_mode)?;
        }
        DepAction::Check {
            dependent,
            depends_on,
        } => {
            let cycle = app
                .store()
                .would_create_cycle(TaskId(*depends_on), TaskId(*dependent))
                .await?;

            let self_dependency = dependent == depends_on;

            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "dependent": dependent,
                    "depends_on": depends_on,
                    "self_dependency": self_dependency,
                    "would_create_cycle": cycle
                }))?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    if self_dependency {
                        println!(
                            "{}: Task cannot depend on itself",
                            output::error("Rejected", &config)
                        );
                    } else if cycle {
                        println!(
                            "{}: #{dependent} -> #{depends_on} would create a cycle",
                            output::error("Rejected", &config)
                        );
                    } else {
                        println!("#{dependent} can depend on #{depends_on} without a cycle");
                    }
                }
            }
        }
    }
    Ok(())
}

/// Execute the map command
pub async fn execute_map(app: &App, args: &MapArgs, output_mode: OutputMode) -> Result<()> {
    let visible = visible_tasks(app, &args.project).await;
    let snapshot = app.service().snapshot(visible.as_ref()).await?;
    output::print_snapshot(&snapshot, output_mode)?;
    Ok(())
}

/// Tasks of the given projects, or `None` for every task.
async fn visible_tasks(app: &App, projects: &[i64]) -> Option<HashSet<TaskId>> {
    if projects.is_empty() {
        return None;
    }
    let ids: Vec<ProjectId> = projects.iter().copied().map(ProjectId).collect();
    Some(app.catalog().tasks_in_projects(&ids).await)
}
