//! Girder - the dependency graph engine of a multi-project task board.
//!
//! The crate stores directed "depends-on" edges between tasks, keeps that edge
//! set acyclic, and derives the two summary views the board renders: linear
//! chains and convergence groups.
//!
//! - [`storage`]: the dependency graph store (validation, cycle checks, persistence)
//! - [`derive`]: pure chain and convergence computation over an edge set
//! - [`api`]: the service callers talk to, with user-facing errors and snapshots
//! - [`catalog`]: the task/project collaborator the store reads from

#![forbid(unsafe_code)]

pub mod api;
pub mod catalog;
pub mod derive;
pub mod domain;
pub mod error;
pub mod storage;

// CLI surface (needed by the binary)
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
