//! # indentkit
//!
//! An indentation structured block tokenizer and two small languages built on it.
//!
//! Layout
//!
//!     The tokenizer turns plain text, indented by one consistent unit, into a balanced
//!     stream of indent / undent / content tokens. What a line means is left to a pluggable
//!     classifier, so the same stream feeds unrelated consumers:
//!
//!         levels    ─▶ lexing ─┬─▶ scaffold   directory/file trees
//!         classify ─┘          └─▶ symbols    symbol → library tables
//!
//!     - [levels]: indent unit detection, whitespace to level and back.
//!     - [lexing]: the tokenizer.
//!     - [classify]: the classifier strategy and its three implementations.
//!     - [queue]: the cursor recursive descent consumers read tokens through.
//!     - [scaffold]: builds (or dry runs) a directory tree from a description.
//!     - [symbols]: loads symbols files and derives import statements from them.
//!     - [settings] and [logging]: layered TOML settings and `tracing` setup for the binary.
//!
//!     Every parse owns its state: trackers, queues and tables are created by the caller and
//!     passed explicitly, nothing is shared between parses.

pub mod classify;
pub mod error;
pub mod levels;
pub mod lexing;
pub mod logging;
pub mod queue;
pub mod scaffold;
pub mod settings;
pub mod symbols;
pub mod token;

pub use error::{Error, LevelError, Result};
pub use lexing::{tokenize, tokenize_with};
pub use scaffold::{build_tree, build_tree_with, FileOp, ScaffoldOptions};
pub use symbols::{load_symbols, LoadOptions, SymbolTable};
pub use token::{Lexeme, Token};
