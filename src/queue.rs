//! Token queue
//!
//!     A consumable cursor over a tokenized document for recursive descent consumers. The
//!     queue is created from a finished token stream, consumed front to back by a single
//!     parse, and dropped.
//!
//!     Every pop goes through [TokenQueue::next], which also keeps the running depth, so
//!     sibling grammar rules cannot desynchronize each other's view of the nesting.

use crate::error::{Error, Result};
use crate::token::{Lexeme, Token};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct TokenQueue<K> {
    tokens: VecDeque<Token<K>>,
    depth: usize,
}

impl<K> TokenQueue<K> {
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        TokenQueue {
            tokens: tokens.into(),
            depth: 0,
        }
    }

    pub fn peek(&self) -> Option<&Token<K>> {
        self.tokens.front()
    }

    pub fn peek_is_indent(&self) -> bool {
        self.peek().is_some_and(Token::is_indent)
    }

    pub fn peek_is_undent(&self) -> bool {
        self.peek().is_some_and(Token::is_undent)
    }

    /// Pops the front token, tracking the nesting depth.
    pub fn next(&mut self) -> Result<Option<Token<K>>> {
        let token = self.tokens.pop_front();
        match &token {
            Some(Token::Indent) => self.depth += 1,
            Some(Token::Undent) => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::structure("UNDENT past level 0"))?;
            }
            _ => {}
        }
        Ok(token)
    }

    /// Pops an Indent or fails.
    pub fn expect_indent(&mut self) -> Result<()> {
        match self.next()? {
            Some(Token::Indent) => Ok(()),
            other => Err(unexpected("INDENT", other.as_ref())),
        }
    }

    /// Pops an Undent or fails.
    pub fn expect_undent(&mut self) -> Result<()> {
        match self.next()? {
            Some(Token::Undent) => Ok(()),
            other => Err(unexpected("UNDENT", other.as_ref())),
        }
    }

    /// Pops a content token or fails.
    pub fn expect_content(&mut self) -> Result<Lexeme<K>> {
        match self.next()? {
            Some(Token::Content(lexeme)) => Ok(lexeme),
            other => Err(unexpected("content", other.as_ref())),
        }
    }

    /// Current nesting depth: indents consumed minus undents consumed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Asserts the whole stream was consumed and every block closed.
    pub fn finish(self) -> Result<()> {
        if let Some(token) = self.tokens.front() {
            return Err(Error::structure(format!(
                "{} tokens left after parse, starting with {}",
                self.tokens.len(),
                token.describe()
            )));
        }
        if self.depth != 0 {
            return Err(Error::structure(format!(
                "{} INDENT(s) left unmatched at end of input",
                self.depth
            )));
        }
        Ok(())
    }
}

fn unexpected<K>(expected: &str, found: Option<&Token<K>>) -> Error {
    match found {
        Some(Token::Content(lexeme)) => {
            Error::structure(format!("expected {expected}, found {:?}", lexeme.text))
        }
        Some(token) => {
            Error::structure(format!("Unexpected {}, expected {expected}", token.describe()))
        }
        None => Error::structure(format!("expected {expected}, found end of input")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(tokens: Vec<Token<&'static str>>) -> TokenQueue<&'static str> {
        TokenQueue::new(tokens)
    }

    #[test]
    fn tracks_depth_while_consuming() {
        let mut q = queue(vec![Token::content("k", "a"), Token::Indent, Token::Undent]);
        assert_eq!(q.expect_content().unwrap().text, "a");
        assert!(q.peek_is_indent());
        q.expect_indent().unwrap();
        assert_eq!(q.depth(), 1);
        q.expect_undent().unwrap();
        assert_eq!(q.depth(), 0);
        q.finish().unwrap();
    }

    #[test]
    fn unexpected_indent_is_reported() {
        let mut q = queue(vec![Token::Indent]);
        let err = q.expect_content().unwrap_err();
        assert_eq!(
            err.to_string(),
            "structure error: Unexpected INDENT, expected content"
        );
    }

    #[test]
    fn undent_below_zero_is_fatal() {
        let mut q = queue(vec![Token::Undent]);
        assert!(matches!(q.next(), Err(Error::Structure(_))));
    }

    #[test]
    fn finish_rejects_leftovers() {
        let q = queue(vec![Token::content("k", "a")]);
        assert!(q.finish().is_err());
    }

    #[test]
    fn finish_rejects_open_blocks() {
        let mut q = queue(vec![Token::Indent]);
        q.expect_indent().unwrap();
        let err = q.finish().unwrap_err();
        assert!(err.to_string().contains("unmatched"));
    }

    #[test]
    fn missing_undent_at_end() {
        let mut q = queue(vec![]);
        let err = q.expect_undent().unwrap_err();
        assert!(err.to_string().contains("end of input"));
    }
}
