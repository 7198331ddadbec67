//! Tokens
//!
//!     The tokenizer produces two families of tokens. Structural tokens, [Token::Indent] and
//!     [Token::Undent], mark a change of one nesting level and carry no text. Content tokens
//!     wrap a [Lexeme]: a piece of line text tagged with a kind chosen by the classifier of
//!     the DSL being parsed.
//!
//!     Indent and undent map nicely to open and close braces: a consumer can treat a token
//!     stream the same way it would a brace-delimited language.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

/// A piece of line content tagged by a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme<K> {
    pub kind: K,
    pub text: String,
}

impl<K> Lexeme<K> {
    pub fn new(kind: K, text: impl Into<String>) -> Self {
        Lexeme {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<K> {
    Indent,
    Undent,
    Content(Lexeme<K>),
}

impl<K> Token<K> {
    pub fn content(kind: K, text: impl Into<String>) -> Self {
        Token::Content(Lexeme::new(kind, text))
    }

    pub fn is_indent(&self) -> bool {
        matches!(self, Token::Indent)
    }

    pub fn is_undent(&self) -> bool {
        matches!(self, Token::Undent)
    }

    /// Short name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Indent => "INDENT",
            Token::Undent => "UNDENT",
            Token::Content(_) => "content",
        }
    }
}

impl<K: fmt::Display> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Indent => write!(f, "<indent>"),
            Token::Undent => write!(f, "<undent>"),
            Token::Content(lexeme) => write!(f, "{}:{}", lexeme.kind, lexeme.text),
        }
    }
}

/// Structural tokens serialize as `{"kind": "indent"}`, content tokens as their lexeme.
impl<K: Serialize> Serialize for Token<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Token::Indent => serialize_structural(serializer, "indent"),
            Token::Undent => serialize_structural(serializer, "undent"),
            Token::Content(lexeme) => lexeme.serialize(serializer),
        }
    }
}

fn serialize_structural<S>(serializer: S, kind: &'static str) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = serializer.serialize_struct("Token", 1)?;
    state.serialize_field("kind", kind)?;
    state.end()
}

/// Checks the balance invariant over a token slice: the running depth never goes negative
/// and ends at zero.
pub fn is_balanced<K>(tokens: &[Token<K>]) -> bool {
    let mut depth: usize = 0;
    for token in tokens {
        match token {
            Token::Indent => depth += 1,
            Token::Undent => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Token::Content(_) => {}
        }
    }
    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let tokens: Vec<Token<&str>> = vec![
            Token::content("lib", "src/fs.ts"),
            Token::Indent,
            Token::content("symbol", "isFile"),
            Token::Undent,
        ];
        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["lib:src/fs.ts", "<indent>", "symbol:isFile", "<undent>"]
        );
    }

    #[test]
    fn balance_check() {
        let ok: Vec<Token<&str>> = vec![Token::Indent, Token::Indent, Token::Undent, Token::Undent];
        let early: Vec<Token<&str>> = vec![Token::Undent, Token::Indent];
        let open: Vec<Token<&str>> = vec![Token::Indent];
        assert!(is_balanced(&ok));
        assert!(!is_balanced(&early));
        assert!(!is_balanced(&open));
    }

    #[test]
    fn serializes_kind_and_text() {
        let tokens: Vec<Token<&str>> = vec![Token::Indent, Token::content("line", "hello")];
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"[{"kind":"indent"},{"kind":"line","text":"hello"}]"#);
    }
}
