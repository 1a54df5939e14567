//! Color helpers for text output.
//!
//! | Role      | Style  | Used for                          |
//! |-----------|--------|-----------------------------------|
//! | success   | green  | confirmations of a mutation       |
//! | error     | red    | rejected previews                 |
//! | warning   | yellow | convergence targets               |
//! | reference | cyan   | task and project ids              |
//! | dimmed    | dimmed | project names, edge ids, arrows   |
//! | bold      | bold   | section headers                   |
//!
//! Every helper returns `text` unchanged when colors are disabled.

use colored::{ColoredString, Colorize};

use super::OutputConfig;

fn paint(text: &str, config: &OutputConfig, style: fn(&str) -> ColoredString) -> String {
    if config.use_colors {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Green, for completed mutations.
pub fn success(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.green())
}

/// Red, for rejected operations.
pub fn error(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.red())
}

/// Yellow, for tasks that need attention.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.yellow())
}

pub(crate) fn reference(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.cyan())
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.dimmed())
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    paint(text, config, |t| t.bold())
}
