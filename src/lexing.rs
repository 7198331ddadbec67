//! Tokenizer
//!
//!     Turns a text block into a flat, ordered stream of tokens where indentation has been
//!     replaced by structural [Indent](Token::Indent) / [Undent](Token::Undent) events.
//!
//! Algorithm
//!
//!     1. Establish the block's indent unit from its first indented line
//!     2. Skip blank lines entirely: they neither emit tokens nor change the level
//!     3. For each remaining line, compute its level and compare with the current one:
//!        - One deeper: emit a single Indent
//!        - More than one deeper: fail, the jump is ambiguous
//!        - Shallower: emit one Undent per level left
//!        - Equal: no structural tokens
//!     4. Hand the stripped line to the classifier and emit its lexemes in order
//!     5. At end of input, emit Undents back to level 0
//!
//!     Step 5 makes every stream self balancing. Consumers never special-case the end of the
//!     document: whatever the last line's level, the stream closes every block it opened.
//!
//!     The tokenizer is a pure function of its inputs and returns a finished `Vec`. Documents
//!     here are small configuration files, so there is nothing to gain from streaming.

use crate::classify::{Classifier, DefaultClassifier, LineKind};
use crate::error::{Error, LevelError, Result};
use crate::levels::{is_blank, leading_whitespace, LevelTracker};
use crate::token::Token;
use std::cmp::Ordering;

/// Tokenizes `text` with a fresh tracker.
pub fn tokenize<C: Classifier>(text: &str, classifier: &mut C) -> Result<Vec<Token<C::Kind>>> {
    let mut tracker = LevelTracker::new();
    tokenize_with(&mut tracker, text, classifier)
}

/// Tokenizes `text` with the [DefaultClassifier].
pub fn tokenize_lines(text: &str) -> Result<Vec<Token<LineKind>>> {
    tokenize(text, &mut DefaultClassifier)
}

/// Tokenizes `text` against a caller owned tracker.
///
/// The tracker's unit is established from `text` if it has none yet, and is left in place
/// afterwards so the caller can rebuild indented lines with [LevelTracker::indented].
pub fn tokenize_with<C: Classifier>(
    tracker: &mut LevelTracker,
    text: &str,
    classifier: &mut C,
) -> Result<Vec<Token<C::Kind>>> {
    tracker.detect_unit(text)?;

    let mut tokens = Vec::new();
    let mut current_level = 0;

    for (idx, line) in text.lines().enumerate() {
        if is_blank(line) {
            continue;
        }
        let line_number = idx + 1;
        let indentation_error = |source: LevelError| Error::Indentation {
            line: line_number,
            source,
        };

        let level = tracker.compute_level(line).map_err(indentation_error)?;

        match level.cmp(&current_level) {
            Ordering::Greater if level - current_level > 1 => {
                return Err(indentation_error(LevelError::Jump {
                    from: current_level,
                    to: level,
                }));
            }
            Ordering::Greater => {
                tracing::debug!(line = line_number, level, "indent");
                tokens.push(Token::Indent);
            }
            Ordering::Less => {
                tracing::debug!(line = line_number, from = current_level, to = level, "undent");
                for _ in level..current_level {
                    tokens.push(Token::Undent);
                }
            }
            Ordering::Equal => {}
        }
        current_level = level;

        let content = &line[leading_whitespace(line).len()..];
        for lexeme in classifier.classify(content, current_level)? {
            tracing::trace!(line = line_number, text = %lexeme.text, "content");
            tokens.push(Token::Content(lexeme));
        }
    }

    if current_level > 0 {
        tracing::debug!(from = current_level, "closing blocks at end of input");
        for _ in 0..current_level {
            tokens.push(Token::Undent);
        }
    }

    tracing::info!(tokens = tokens.len(), unit = ?tracker.unit(), "tokenized block");
    Ok(tokens)
}
