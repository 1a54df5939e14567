//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::{ChainHeads, ProjectScope};

/// Chain head policy for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainHeadsArg {
    /// Only tasks without prerequisites start chains
    Roots,
    /// Runs may also start just past a fork or convergence
    LinearRuns,
}

impl From<ChainHeadsArg> for ChainHeads {
    fn from(arg: ChainHeadsArg) -> Self {
        match arg {
            ChainHeadsArg::Roots => ChainHeads::Roots,
            ChainHeadsArg::LinearRuns => ChainHeads::LinearRuns,
        }
    }
}

/// Project scope for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectScopeArg {
    /// Dependencies may cross projects
    Any,
    /// Both tasks must be in the same project
    SameProject,
}

impl From<ProjectScopeArg> for ProjectScope {
    fn from(arg: ProjectScopeArg) -> Self {
        match arg {
            ProjectScopeArg::Any => ProjectScope::Any,
            ProjectScopeArg::SameProject => ProjectScope::SameProject,
        }
    }
}
