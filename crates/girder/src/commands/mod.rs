//! Commands that operate on the repository layout rather than on the graph.

pub mod init;
