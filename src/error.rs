//! Error types
//!
//!     Every failure in indentkit is fatal for the parse that raised it: there is no recovery
//!     and no partial result. The variants follow the three families a document can fail in
//!     (indentation, structure, preconditions) plus the plumbing errors from I/O and config.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the [Level Tracker](crate::levels::LevelTracker) while measuring
/// leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The first indented line mixes whitespace characters, so no unit can be derived.
    #[error("indent unit {found:?} is not a run of a single whitespace character")]
    MixedUnit { found: String },
    /// Leading whitespace that is not a whole number of indent units.
    #[error("leading whitespace {found:?} is not a multiple of the indent unit {unit:?}")]
    NotAMultiple { found: String, unit: String },
    /// A line more than one level deeper than the line before it.
    #[error("unexpected indentation jump from level {from} to level {to}")]
    Jump { from: usize, to: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("indentation error on line {line}: {source}")]
    Indentation {
        line: usize,
        #[source]
        source: LevelError,
    },

    #[error("structure error: {0}")]
    Structure(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn structure(msg: impl Into<String>) -> Self {
        Error::Structure(msg.into())
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::Precondition(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
