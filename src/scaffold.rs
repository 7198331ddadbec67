//! Scaffold Interpreter
//!
//!     Builds a directory tree from an indentation structured description:
//!
//!         src/
//!             main.rs
//!                 fn main() {}
//!         README.md
//!
//!     A line ending in a path separator names a directory and its nested block lists the
//!     directory's contents. Any other line names a file; a nested block under a file is the
//!     file's literal contents, with the block's own internal indentation rebuilt through
//!     [LevelTracker::indented].
//!
//! Grammar
//!
//!     The consumer is a small recursive descent parser over a [TokenQueue]:
//!
//!         block     := (directory | file)*                 until UNDENT or end of input
//!         directory := ENTRY(ends with separator) [INDENT block UNDENT]
//!         file      := ENTRY [INDENT (ENTRY | INDENT | UNDENT)* UNDENT]
//!
//! Modes
//!
//!     Interpretation never touches the disk: it produces an ordered [FileOp] log. In scaffold
//!     (dry run) mode that log is the result. In live mode it is replayed with [apply]. Since
//!     the whole document is tokenized and interpreted first, a malformed document fails
//!     before any directory is created.

use crate::classify::{ScaffoldClassifier, ScaffoldKind};
use crate::error::{Error, Result};
use crate::levels::LevelTracker;
use crate::lexing::tokenize_with;
use crate::queue::TokenQueue;
use crate::token::Token;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Log the planned operations as a table.
    pub debug: bool,
    /// Remove an existing root directory before building.
    pub clear: bool,
    /// Dry run: return the operations instead of performing them.
    pub scaffold: bool,
}

/// An intended filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum FileOp {
    Mkdir { path: PathBuf },
    Write { path: PathBuf, contents: String },
}

impl FileOp {
    pub fn mkdir(path: impl Into<PathBuf>) -> Self {
        FileOp::Mkdir { path: path.into() }
    }

    pub fn write(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        FileOp::Write {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileOp::Mkdir { .. } => "mkdir",
            FileOp::Write { .. } => "write",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileOp::Mkdir { path } | FileOp::Write { path, .. } => path,
        }
    }
}

/// Builds the tree described by `spec` under `root`.
///
/// Returns the recorded operations when `options.scaffold` is set, and an empty list after
/// performing them otherwise.
pub fn build_tree(
    root: impl AsRef<Path>,
    spec: &str,
    options: &ScaffoldOptions,
) -> Result<Vec<FileOp>> {
    build_tree_with(&mut LevelTracker::new(), root, spec, options)
}

/// [build_tree] measuring indentation with a caller owned tracker.
pub fn build_tree_with(
    tracker: &mut LevelTracker,
    root: impl AsRef<Path>,
    spec: &str,
    options: &ScaffoldOptions,
) -> Result<Vec<FileOp>> {
    let root = root.as_ref();
    check_root(root)?;

    let ops = interpret_with(tracker, root, spec)?;
    if options.debug {
        tracing::info!(root = %root.display(), "scaffold plan:\n{}", render_ops(&ops));
    }
    if options.scaffold {
        return Ok(ops);
    }

    if options.clear && root.is_dir() {
        tracing::info!(root = %root.display(), "clearing existing root");
        fs::remove_dir_all(root).map_err(|e| Error::io(root, e))?;
    }
    apply(&ops)?;
    tracing::info!(root = %root.display(), ops = ops.len(), "scaffold built");
    Ok(Vec::new())
}

/// Parses `spec` into the operations that build it under `root`, without touching the disk.
pub fn interpret(root: impl AsRef<Path>, spec: &str) -> Result<Vec<FileOp>> {
    interpret_with(&mut LevelTracker::new(), root, spec)
}

/// [interpret] against a caller owned tracker. File bodies are rebuilt with its unit.
pub fn interpret_with(
    tracker: &mut LevelTracker,
    root: impl AsRef<Path>,
    spec: &str,
) -> Result<Vec<FileOp>> {
    let root = root.as_ref();
    let tokens = tokenize_with(tracker, spec, &mut ScaffoldClassifier)?;

    let mut builder = TreeBuilder {
        queue: TokenQueue::new(tokens),
        tracker: &*tracker,
        ops: Vec::new(),
    };
    builder.record(FileOp::mkdir(root));
    builder.block(root)?;

    let TreeBuilder { queue, ops, .. } = builder;
    queue.finish()?;
    tracing::info!(root = %root.display(), ops = ops.len(), "interpreted scaffold");
    Ok(ops)
}

/// Performs `ops` in order, creating intermediate directories as needed.
pub fn apply(ops: &[FileOp]) -> Result<()> {
    for op in ops {
        match op {
            FileOp::Mkdir { path } => {
                fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
            }
            FileOp::Write { path, contents } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
                }
                fs::write(path, contents).map_err(|e| Error::io(path, e))?;
            }
        }
    }
    Ok(())
}

/// Renders `ops` as a two column table of operation and path.
pub fn render_ops(ops: &[FileOp]) -> String {
    let width = ops.iter().map(|op| op.name().len()).max().unwrap_or(0);
    ops.iter()
        .map(|op| format!("{:<width$}  {}", op.name(), op.path().display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_root(root: &Path) -> Result<()> {
    if root.exists() && !root.is_dir() {
        return Err(Error::precondition(format!(
            "{} exists and is not a directory",
            root.display()
        )));
    }
    Ok(())
}

fn is_directory_entry(name: &str) -> bool {
    name.ends_with('/') || name.ends_with(MAIN_SEPARATOR)
}

struct TreeBuilder<'a> {
    queue: TokenQueue<ScaffoldKind>,
    tracker: &'a LevelTracker,
    ops: Vec<FileOp>,
}

impl TreeBuilder<'_> {
    fn record(&mut self, op: FileOp) {
        tracing::debug!(op = op.name(), path = %op.path().display(), "recorded");
        self.ops.push(op);
    }

    fn block(&mut self, dir: &Path) -> Result<()> {
        while let Some(token) = self.queue.peek() {
            if token.is_undent() {
                break;
            }
            let entry = self.queue.expect_content()?;
            let name = entry.text.trim_end();
            if is_directory_entry(name) {
                let name = name.trim_end_matches(['/', MAIN_SEPARATOR]);
                self.directory(join_entry(dir, name)?)?;
            } else {
                self.file(join_entry(dir, name)?)?;
            }
        }
        Ok(())
    }

    fn directory(&mut self, path: PathBuf) -> Result<()> {
        self.record(FileOp::mkdir(&path));
        if self.queue.peek_is_indent() {
            self.queue.expect_indent()?;
            self.block(&path)?;
            self.queue.expect_undent()?;
        }
        Ok(())
    }

    fn file(&mut self, path: PathBuf) -> Result<()> {
        let mut lines = Vec::new();
        if self.queue.peek_is_indent() {
            self.queue.expect_indent()?;
            let mut level = 0usize;
            loop {
                match self.queue.next()? {
                    Some(Token::Indent) => level += 1,
                    Some(Token::Undent) if level == 0 => break,
                    Some(Token::Undent) => level -= 1,
                    Some(Token::Content(lexeme)) => {
                        lines.push(self.tracker.indented(&lexeme.text, level))
                    }
                    None => {
                        return Err(Error::structure(format!(
                            "contents of {} are missing their UNDENT",
                            path.display()
                        )))
                    }
                }
            }
        }
        self.record(FileOp::write(path, lines.join("\n")));
        Ok(())
    }
}

/// Joins an entry name onto its directory. Names must stay inside the directory.
fn join_entry(dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || name.is_empty() {
        return Err(Error::structure(format!(
            "entry {name:?} must be a relative path inside {}",
            dir.display()
        )));
    }
    Ok(dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run() -> ScaffoldOptions {
        ScaffoldOptions {
            scaffold: true,
            ..ScaffoldOptions::default()
        }
    }

    #[test]
    fn directories_files_and_contents() {
        let spec = "src/\n\tfile.txt\n\t\thello\n\t\tworld\nother.txt\n";
        let ops = build_tree("root", spec, &dry_run()).unwrap();
        assert_eq!(
            ops,
            vec![
                FileOp::mkdir("root"),
                FileOp::mkdir("root/src"),
                FileOp::write("root/src/file.txt", "hello\nworld"),
                FileOp::write("root/other.txt", ""),
            ]
        );
    }

    #[test]
    fn file_contents_keep_internal_indentation() {
        let spec = "main.rs\n  fn main() {\n    run();\n  }\n";
        let ops = interpret("app", spec).unwrap();
        assert_eq!(
            ops[1],
            FileOp::write("app/main.rs", "fn main() {\n  run();\n}")
        );
    }

    #[test]
    fn nested_directories() {
        let spec = "a/\n\tb/\n\t\tc/\n\td.txt\n";
        let ops = interpret("r", spec).unwrap();
        let paths: Vec<_> = ops.iter().map(|op| op.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("r"),
                PathBuf::from("r/a"),
                PathBuf::from("r/a/b"),
                PathBuf::from("r/a/b/c"),
                PathBuf::from("r/a/d.txt"),
            ]
        );
    }

    #[test]
    fn document_ending_deep_still_closes() {
        let spec = "docs/\n  notes.md\n    last line";
        let ops = interpret("r", spec).unwrap();
        assert_eq!(ops.last(), Some(&FileOp::write("r/docs/notes.md", "last line")));
    }

    #[test]
    fn leading_indent_is_unexpected() {
        let err = interpret("r", "\tfile.txt\n").unwrap_err();
        assert!(err.to_string().contains("Unexpected INDENT"));
    }

    #[test]
    fn parent_components_are_rejected() {
        assert!(matches!(
            interpret("r", "../evil.txt\n"),
            Err(Error::Structure(_))
        ));
    }

    #[test]
    fn empty_spec_only_creates_root() {
        assert_eq!(interpret("r", "").unwrap(), vec![FileOp::mkdir("r")]);
    }

    #[test]
    fn caller_tracker_keeps_document_unit() {
        let mut tracker = LevelTracker::with_default_unit("  ").unwrap();
        let ops = interpret_with(&mut tracker, "r", "f.txt\n\ta\n\t\tb\n").unwrap();
        assert_eq!(ops[1], FileOp::write("r/f.txt", "a\n\tb"));
        assert_eq!(tracker.unit(), Some("\t"));
    }

    #[test]
    fn render_table() {
        let ops = vec![
            FileOp::mkdir("root"),
            FileOp::mkdir("root/src"),
            FileOp::write("root/src/file.txt", "hello"),
        ];
        insta::assert_snapshot!(render_ops(&ops), @r"
mkdir  root
mkdir  root/src
write  root/src/file.txt
");
    }

    #[test]
    fn serializes_op_log() {
        let json = serde_json::to_string(&FileOp::write("a/b", "x")).unwrap();
        assert_eq!(json, r#"{"op":"write","path":"a/b","contents":"x"}"#);
    }
}
