//! Non-fatal problems found while reading a record file.

use std::fmt;

/// A line that was not turned into a record.
///
/// Loading keeps going after a warning; the caller decides whether to report
/// it, log it, or ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The line is not valid JSON for the expected record type.
    MalformedJson {
        /// The 1-based line number.
        line_number: usize,
        /// Parser message.
        error: String,
    },

    /// The line is not valid UTF-8.
    InvalidUtf8 {
        /// The 1-based line number.
        line_number: usize,
    },
}

impl Warning {
    /// Returns the 1-based line number this warning refers to.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::InvalidUtf8 { line_number } => {
                *line_number
            }
        }
    }

    /// Short machine-friendly tag for grouping warnings.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::InvalidUtf8 { .. } => "invalid_utf8",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::InvalidUtf8 { line_number } => {
                write!(f, "line {line_number}: not valid UTF-8")
            }
        }
    }
}

impl std::error::Error for Warning {}
