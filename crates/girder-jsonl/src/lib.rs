//! Line-oriented JSON record files for girder.
//!
//! Every file handled here holds one serialized record per line. Reading is
//! resilient: a damaged line becomes a [`Warning`] instead of aborting the whole
//! load. Writing goes through a temporary file and a rename so a crash never
//! leaves a half-written data file behind.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{read_jsonl_resilient, JsonlReader};
pub use warning::Warning;
pub use writer::JsonlWriter;
