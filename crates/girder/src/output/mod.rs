//! Output formatting for CLI commands.
//!
//! Every printer supports a human-readable text form and a JSON form for
//! programmatic use. Text writers take any [`Write`] so they can be tested
//! without touching stdout.

pub mod color;

use crate::api::{EdgeView, Snapshot};
use crate::domain::{Project, TaskSummary};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{bold, dimmed, reference};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Settings that control text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an OutputConfig with explicit values.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Read settings from the environment.
    ///
    /// Colors are disabled when `NO_COLOR` is set, or when `GIRDER_COLOR` is
    /// `0` or `false`.
    #[must_use]
    pub fn from_env() -> Self {
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("GIRDER_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);
        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Print a JSON-formatted result for any serializable value
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// Print projects in the specified format
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_projects(projects: &[Project], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&projects),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_projects_text(&mut handle, projects, &OutputConfig::from_env())
        }
    }
}

/// Print tasks in the specified format
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_tasks(tasks: &[TaskSummary], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&tasks),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_tasks_text(&mut handle, tasks, &OutputConfig::from_env())
        }
    }
}

/// Print resolved edges in the specified format
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_edges(edges: &[EdgeView], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&edges),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_edges_text(&mut handle, edges, &OutputConfig::from_env())
        }
    }
}

/// Print a full snapshot in the specified format
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn print_snapshot(snapshot: &Snapshot, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(snapshot),
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_snapshot_text(&mut handle, snapshot, &OutputConfig::from_env())
        }
    }
}

// ============================================================================
// Text Formatting
// ============================================================================

fn task_label(task: &TaskSummary, config: &OutputConfig) -> String {
    format!(
        "{} {} {}",
        reference(&format!("#{}", task.id), config),
        task.title,
        dimmed(&format!("({})", task.project_name), config)
    )
}

fn write_projects_text<W: Write>(
    w: &mut W,
    projects: &[Project],
    config: &OutputConfig,
) -> io::Result<()> {
    if projects.is_empty() {
        return writeln!(w, "No projects");
    }
    for project in projects {
        writeln!(
            w,
            "{} {}",
            reference(&format!("#{}", project.id), config),
            project.name
        )?;
    }
    Ok(())
}

fn write_tasks_text<W: Write>(
    w: &mut W,
    tasks: &[TaskSummary],
    config: &OutputConfig,
) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(w, "No tasks");
    }
    for task in tasks {
        writeln!(w, "{}", task_label(task, config))?;
    }
    Ok(())
}

fn write_edge_line<W: Write>(w: &mut W, edge: &EdgeView, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "  {} {} {} {}",
        dimmed(&format!("[{}]", edge.id), config),
        task_label(&edge.depends_on, config),
        dimmed("->", config),
        task_label(&edge.dependent, config)
    )
}

fn write_edges_text<W: Write>(
    w: &mut W,
    edges: &[EdgeView],
    config: &OutputConfig,
) -> io::Result<()> {
    if edges.is_empty() {
        return writeln!(w, "No dependencies");
    }
    writeln!(w, "{}", bold(&format!("Dependencies ({}):", edges.len()), config))?;
    for edge in edges {
        write_edge_line(w, edge, config)?;
    }
    Ok(())
}

/// Render a snapshot as text: edges, then chains, then convergences.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_snapshot_text<W: Write>(
    w: &mut W,
    snapshot: &Snapshot,
    config: &OutputConfig,
) -> io::Result<()> {
    write_edges_text(w, &snapshot.edges, config)?;
    if snapshot.is_empty() {
        return Ok(());
    }

    if !snapshot.chains.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            bold(&format!("Chains ({}):", snapshot.chains.len()), config)
        )?;
        let arrow = format!(" {} ", dimmed("->", config));
        for chain in &snapshot.chains {
            let labels: Vec<String> = chain.tasks.iter().map(|t| task_label(t, config)).collect();
            writeln!(w, "  {}", labels.join(&arrow))?;
        }
    }

    if !snapshot.convergences.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            bold(
                &format!("Convergences ({}):", snapshot.convergences.len()),
                config
            )
        )?;
        for group in &snapshot.convergences {
            let sources: Vec<String> = group
                .sources
                .iter()
                .map(|t| task_label(t, config))
                .collect();
            writeln!(
                w,
                "  {} {} {}",
                warning(&task_label(&group.target, config), config),
                dimmed("<-", config),
                sources.join(", ")
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChainView, ConvergenceView};
    use crate::domain::{EdgeId, ProjectId, TaskId};

    fn task(id: i64, title: &str) -> TaskSummary {
        TaskSummary {
            id: TaskId(id),
            title: title.to_string(),
            project_id: ProjectId(1),
            project_name: "Site".to_string(),
        }
    }

    fn render(snapshot: &Snapshot) -> String {
        let mut buf = Vec::new();
        write_snapshot_text(&mut buf, snapshot, &OutputConfig::new(false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_snapshot_says_so() {
        assert_eq!(render(&Snapshot::default()), "No dependencies\n");
    }

    #[test]
    fn snapshot_lists_every_section() {
        let (a, b, c) = (task(1, "Design"), task(2, "Build"), task(3, "Ship"));
        let snapshot = Snapshot {
            tasks: vec![a.clone(), b.clone(), c.clone()],
            edges: vec![
                EdgeView {
                    id: EdgeId(1),
                    depends_on: a.clone(),
                    dependent: c.clone(),
                },
                EdgeView {
                    id: EdgeId(2),
                    depends_on: b.clone(),
                    dependent: c.clone(),
                },
            ],
            chains: vec![ChainView {
                tasks: vec![a.clone(), c.clone()],
            }],
            convergences: vec![ConvergenceView {
                sources: vec![a, b],
                target: c,
            }],
        };

        let text = render(&snapshot);
        assert!(text.contains("Dependencies (2):"));
        assert!(text.contains("[1] #1 Design (Site) -> #3 Ship (Site)"));
        assert!(text.contains("Chains (1):"));
        assert!(text.contains("Convergences (1):"));
        assert!(text.contains("#3 Ship (Site) <- #1 Design (Site), #2 Build (Site)"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut buf = Vec::new();
        write_tasks_text(&mut buf, &[task(4, "Write")], &OutputConfig::new(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "#4 Write (Site)\n");
    }
}
