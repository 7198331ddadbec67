//! Line Classification
//!
//!     The tokenizer owns indentation; what a line *means* belongs to the DSL. A [Classifier]
//!     receives each non-blank line with its indentation already stripped, together with the
//!     level it sits at, and turns it into zero or more tagged lexemes.
//!
//!     Three classifiers ship with the crate:
//!
//!         - [DefaultClassifier]: one `line` lexeme per line.
//!         - [ScaffoldClassifier]: one `entry` lexeme per line, used by the scaffold builder.
//!         - [SymbolsClassifier]: `lib` lexemes at level 0 and one `symbol` lexeme per word
//!           at level 1; anything deeper is rejected.

use crate::error::{Error, Result};
use crate::token::Lexeme;
use serde::Serialize;
use std::fmt;

/// Strategy turning one content line into DSL specific lexemes.
pub trait Classifier {
    type Kind;

    /// `line` has no leading indentation; `level` is the nesting depth it was found at.
    fn classify(&mut self, line: &str, level: usize) -> Result<Vec<Lexeme<Self::Kind>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Line,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line")
    }
}

/// Emits the whole line as a single generic lexeme.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClassifier;

impl Classifier for DefaultClassifier {
    type Kind = LineKind;

    fn classify(&mut self, line: &str, _level: usize) -> Result<Vec<Lexeme<LineKind>>> {
        Ok(vec![Lexeme::new(LineKind::Line, line)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaffoldKind {
    /// A directory line, a file line, or a line of file contents. Which one is decided by
    /// the grammar, not the classifier.
    Entry,
}

impl fmt::Display for ScaffoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry")
    }
}

/// Tags every raw line as one entry. Text is kept verbatim so file bodies survive intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaffoldClassifier;

impl Classifier for ScaffoldClassifier {
    type Kind = ScaffoldKind;

    fn classify(&mut self, line: &str, _level: usize) -> Result<Vec<Lexeme<ScaffoldKind>>> {
        Ok(vec![Lexeme::new(ScaffoldKind::Entry, line)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Lib,
    Symbol,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Lib => write!(f, "lib"),
            SymbolKind::Symbol => write!(f, "symbol"),
        }
    }
}

/// Classifier for symbols files: libraries at level 0, symbol lists at level 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolsClassifier;

impl Classifier for SymbolsClassifier {
    type Kind = SymbolKind;

    fn classify(&mut self, line: &str, level: usize) -> Result<Vec<Lexeme<SymbolKind>>> {
        match level {
            0 => Ok(vec![Lexeme::new(SymbolKind::Lib, line.trim_end())]),
            1 => Ok(line
                .split_whitespace()
                .map(|word| Lexeme::new(SymbolKind::Symbol, word))
                .collect()),
            _ => Err(Error::structure(format!(
                "symbols file nests {line:?} at level {level}, only libraries (level 0) and symbol lists (level 1) are allowed"
            ))),
        }
    }
}
