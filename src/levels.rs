//! Level Tracker
//!
//!     Translates leading whitespace into integer nesting levels and back.
//!
//!     A block does not declare its indentation: the first indented line establishes the
//!     indent unit, which must be a run of one repeated whitespace character (two spaces,
//!     four spaces, a tab). Every other indented line in that block must then be an exact
//!     multiple of the unit. Anything else is an [IndentationError](crate::Error::Indentation).
//!
//!     The unit is block scoped. A tracker remembers it until [LevelTracker::reset_unit] is
//!     called, so a tracker should either be created per parse or reset between parses.
//!
//! Inverse
//!
//!     [LevelTracker::indented] is the inverse of [LevelTracker::compute_level]: it prepends
//!     `level` copies of the unit to a piece of content. The scaffold interpreter uses it to
//!     rebuild file bodies with their internal indentation intact. Before a unit has been
//!     established the tracker's default unit is used on both sides, so the round trip holds
//!     either way. The default is one tab unless the tracker was built with
//!     [LevelTracker::with_default_unit].

use crate::error::{Error, LevelError, Result};

/// Default unit of a [LevelTracker::new] tracker.
pub const DEFAULT_UNIT: &str = "\t";

/// Returns the leading run of spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let content = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - content.len()]
}

/// A line is blank when it holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTracker {
    unit: Option<String>,
    default_unit: String,
}

impl LevelTracker {
    pub fn new() -> Self {
        LevelTracker {
            unit: None,
            default_unit: DEFAULT_UNIT.to_string(),
        }
    }

    /// A tracker that falls back to `unit` until a block establishes its own.
    ///
    /// The unit must be a non-empty run of one space or tab character.
    pub fn with_default_unit(unit: impl Into<String>) -> std::result::Result<Self, LevelError> {
        let unit = unit.into();
        if !unit.starts_with([' ', '\t']) {
            return Err(LevelError::MixedUnit { found: unit });
        }
        Ok(LevelTracker {
            unit: None,
            default_unit: establish(&unit)?,
        })
    }

    /// The established unit, if any line has established one yet.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// The unit currently in effect: the established one, or the default.
    pub fn effective_unit(&self) -> &str {
        self.unit.as_deref().unwrap_or(&self.default_unit)
    }

    /// Forgets the established unit. The default is kept.
    pub fn reset_unit(&mut self) {
        self.unit = None;
    }

    /// Scans `block` for its first indented line and establishes the unit from it.
    ///
    /// Does nothing when a unit is already established or the block has no indented
    /// lines. Errors carry the 1-based line number of the offending line.
    pub fn detect_unit(&mut self, block: &str) -> Result<Option<&str>> {
        if self.unit.is_none() {
            let first_indented = block
                .lines()
                .enumerate()
                .filter(|(_, line)| !is_blank(line))
                .map(|(idx, line)| (idx + 1, leading_whitespace(line)))
                .find(|(_, ws)| !ws.is_empty());

            if let Some((line, ws)) = first_indented {
                let unit = establish(ws).map_err(|source| Error::Indentation { line, source })?;
                tracing::debug!(unit = ?unit, line, "established indent unit");
                self.unit = Some(unit);
            }
        }
        Ok(self.unit.as_deref())
    }

    /// Number of whole indent units at the start of `line`.
    pub fn compute_level(&self, line: &str) -> std::result::Result<usize, LevelError> {
        let ws = leading_whitespace(line);
        if ws.is_empty() {
            return Ok(0);
        }

        let unit = self.effective_unit();
        let not_a_multiple = || LevelError::NotAMultiple {
            found: ws.to_string(),
            unit: unit.to_string(),
        };

        if unit.is_empty() || ws.len() % unit.len() != 0 {
            return Err(not_a_multiple());
        }
        let level = ws.len() / unit.len();
        if ws != unit.repeat(level) {
            return Err(not_a_multiple());
        }
        Ok(level)
    }

    /// Prepends `level` copies of the effective unit to `content`.
    pub fn indented(&self, content: &str, level: usize) -> String {
        let unit = self.effective_unit();
        let mut line = String::with_capacity(unit.len() * level + content.len());
        for _ in 0..level {
            line.push_str(unit);
        }
        line.push_str(content);
        line
    }
}

impl Default for LevelTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit must be one whitespace character repeated.
fn establish(ws: &str) -> std::result::Result<String, LevelError> {
    let mut chars = ws.chars();
    match chars.next() {
        Some(first) if chars.all(|c| c == first) => Ok(ws.to_string()),
        _ => Err(LevelError::MixedUnit {
            found: ws.to_string(),
        }),
    }
}
