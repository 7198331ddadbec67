//! Symbol-Library Loader
//!
//!     Loads a two level symbols document into a lookup table from symbol name to the library
//!     that exports it:
//!
//!         src/lib/fs.ts
//!             isFile isDir
//!         src/lib/str.ts
//!             pad trim
//!
//!     Level 0 lines name a library (a path or a module name), level 1 lines list the symbols
//!     it provides, separated by whitespace. Nesting is already encoded in the token stream,
//!     so the loader is a single linear pass: indent and undent only need checking, not
//!     interpreting.
//!
//!     Tables are built once and then only queried. There is no process wide default: callers
//!     that want the conventional `src/.symbols` file construct it with
//!     [SymbolTable::discover] and pass it around.

use crate::classify::{SymbolKind, SymbolsClassifier};
use crate::error::{Error, Result};
use crate::lexing::tokenize;
use crate::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the symbols file relative to a project root.
pub const DEFAULT_SYMBOLS_PATH: &str = "src/.symbols";

/// `lodash`, `node:fs`, `node:fs/promises`: names resolved by the module system.
static BARE_MODULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*(:[A-Za-z0-9_/-]+)?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail when a library path does not exist.
    pub check_files: bool,
    /// Directory library paths are resolved against when checking.
    pub base_dir: PathBuf,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            check_files: false,
            base_dir: PathBuf::from("."),
        }
    }
}

/// Symbol name to owning library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    libs: HashMap<String, String>,
}

/// Loads a symbols document.
pub fn load_symbols(text: &str, options: &LoadOptions) -> Result<SymbolTable> {
    let tokens = tokenize(text, &mut SymbolsClassifier)?;

    let mut libs = HashMap::new();
    let mut current_lib: Option<String> = None;
    let mut depth = 0usize;

    for token in tokens {
        match token {
            Token::Indent => {
                depth += 1;
                if depth > 1 {
                    return Err(Error::structure("symbols file nests deeper than one level"));
                }
            }
            Token::Undent => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::structure("UNDENT past level 0"))?;
            }
            Token::Content(lexeme) => match lexeme.kind {
                SymbolKind::Lib => {
                    if options.check_files {
                        let path = options.base_dir.join(&lexeme.text);
                        if !path.exists() {
                            return Err(Error::precondition(format!(
                                "library {} does not exist",
                                path.display()
                            )));
                        }
                    }
                    current_lib = Some(lexeme.text);
                }
                SymbolKind::Symbol => {
                    let lib = current_lib.as_ref().ok_or_else(|| {
                        Error::structure(format!("symbol {:?} outside any library", lexeme.text))
                    })?;
                    if let Some(previous) = libs.insert(lexeme.text.clone(), lib.clone()) {
                        if &previous != lib {
                            tracing::warn!(
                                symbol = %lexeme.text,
                                previous = %previous,
                                lib = %lib,
                                "symbol redefined, keeping the later library"
                            );
                        }
                    }
                }
            },
        }
    }

    tracing::info!(symbols = libs.len(), "loaded symbols table");
    Ok(SymbolTable { libs })
}

impl SymbolTable {
    /// Reads and loads a symbols file.
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        load_symbols(&text, options)
    }

    /// Loads `<root>/src/.symbols` if it exists.
    pub fn discover(root: impl AsRef<Path>) -> Result<Option<Self>> {
        let root = root.as_ref();
        let path = root.join(DEFAULT_SYMBOLS_PATH);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no symbols file");
            return Ok(None);
        }
        let options = LoadOptions {
            base_dir: root.to_path_buf(),
            ..LoadOptions::default()
        };
        Self::from_path(&path, &options).map(Some)
    }

    /// The library that provides `symbol`.
    pub fn source_lib(&self, symbol: &str) -> Option<&str> {
        self.libs.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.libs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libs.is_empty()
    }

    /// All entries, sorted by symbol name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .libs
            .iter()
            .map(|(symbol, lib)| (symbol.as_str(), lib.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Groups `symbols` by owning library.
    ///
    /// Libraries appear in the order their first symbol does, symbols in first seen order.
    /// Unknown symbols are skipped and repeated ones kept once.
    pub fn libs_and_symbols<'s, I>(&self, symbols: I) -> Vec<(String, Vec<String>)>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for symbol in symbols {
            let Some(lib) = self.source_lib(symbol) else {
                tracing::debug!(symbol, "no library provides symbol");
                continue;
            };
            let index = match groups.iter().position(|(name, _)| name == lib) {
                Some(index) => index,
                None => {
                    groups.push((lib.to_string(), Vec::new()));
                    groups.len() - 1
                }
            };
            let names = &mut groups[index].1;
            if !names.iter().any(|name| name == symbol) {
                names.push(symbol.to_string());
            }
        }
        groups
    }

    /// One import statement per library contributing to `symbols`.
    pub fn needed_import_statements<'s, I>(&self, symbols: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'s str>,
    {
        self.libs_and_symbols(symbols)
            .into_iter()
            .map(|(lib, names)| {
                format!("import {{{}}} from '{}';", names.join(", "), import_specifier(&lib))
            })
            .collect()
    }
}

/// The module specifier used to import `lib`.
///
/// Rooted specifiers (`@scope/pkg`, `./x`, `../x`, `/abs`) and bare module names are used
/// as they are; anything else is a filename relative to the project and gets `./`.
///
/// A bare module name is one word of letters, digits, `_` and `-`, optionally followed by a
/// `scheme:` style subpath (`node:fs/promises`). A slash or a dot outside that form reads as
/// a project file, so unscoped package subpaths and dotted package names (`lodash/fp`,
/// `lodash.merge`) come out as `./lodash/fp` and `./lodash.merge`.
pub fn import_specifier(lib: &str) -> String {
    if lib.starts_with(['@', '.', '/']) || BARE_MODULE.is_match(lib) {
        lib.to_string()
    } else {
        format!("./{lib}")
    }
}
