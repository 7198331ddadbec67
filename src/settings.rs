//! Settings
//!
//!     Four layers, later ones winning:
//!
//!         defaults/indentkit.default.toml   embedded at build time
//!         ./indentkit.toml                  optional, per project
//!         --config <file>                   explicit, must exist
//!         command line flags                single key overrides
//!
//!     [Loader] stacks them with the `config` crate and deserializes the result into
//!     [IndentKitConfig]. Keeping the defaults in a TOML file rather than in code means the
//!     file doubles as the reference for every key.

use crate::error::{LevelError, Result};
use crate::levels::LevelTracker;
use crate::scaffold::ScaffoldOptions;
use crate::symbols::LoadOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, Source, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/indentkit.default.toml");

/// Name of the optional per-project configuration file.
pub const PROJECT_CONFIG: &str = "indentkit.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct IndentKitConfig {
    pub indent: IndentConfig,
    pub scaffold: ScaffoldConfig,
    pub symbols: SymbolsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndentConfig {
    /// Unit assumed until a document establishes its own.
    pub default_unit: String,
}

impl IndentConfig {
    pub fn tracker(&self) -> std::result::Result<LevelTracker, LevelError> {
        LevelTracker::with_default_unit(self.default_unit.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScaffoldConfig {
    pub debug: bool,
    pub clear: bool,
    pub dry_run: bool,
}

impl ScaffoldConfig {
    pub fn options(&self) -> ScaffoldOptions {
        ScaffoldOptions {
            debug: self.debug,
            clear: self.clear,
            scaffold: self.dry_run,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolsConfig {
    pub path: PathBuf,
    pub check_files: bool,
}

impl SymbolsConfig {
    /// Load options resolving library paths against `base_dir`.
    pub fn options(&self, base_dir: impl Into<PathBuf>) -> LoadOptions {
        LoadOptions {
            check_files: self.check_files,
            base_dir: base_dir.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the embedded defaults.
    pub fn new() -> Self {
        Loader {
            builder: Config::builder(),
        }
        .layer(File::from_str(DEFAULT_TOML, FileFormat::Toml))
    }

    /// Layers a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(File::from(path.as_ref()).format(FileFormat::Toml).required(true))
    }

    /// Layers a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(File::from(path.as_ref()).format(FileFormat::Toml).required(false))
    }

    /// Sets one dotted key, e.g. `scaffold.dry_run`, above every file layer.
    pub fn set_override(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merges the layers. An unusable `indent.default_unit` is reported here rather than
    /// when the first tracker is built.
    pub fn build(self) -> Result<IndentKitConfig> {
        let config: IndentKitConfig = self.builder.build()?.try_deserialize()?;
        config
            .indent
            .tracker()
            .map_err(|e| ConfigError::Message(format!("indent.default_unit: {e}")))?;
        Ok(config)
    }

    fn layer<S>(mut self, source: S) -> Self
    where
        S: Source + Send + Sync + 'static,
    {
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    fn toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert_eq!(config.indent.default_unit, "\t");
        assert!(!config.scaffold.dry_run);
        assert_eq!(config.symbols.path, PathBuf::from("src/.symbols"));
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("scaffold.dry_run", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.scaffold.options().scaffold);
    }

    #[test]
    fn layers_user_file() {
        let file = toml("[symbols]\ncheck_files = true\n");
        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert!(config.symbols.check_files);
        assert_eq!(config.symbols.path, PathBuf::from("src/.symbols"));
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does/not/exist.toml")
            .build()
            .unwrap();
        assert!(!config.scaffold.clear);
    }

    #[test]
    fn missing_required_file_fails() {
        let err = Loader::new().with_file("does/not/exist.toml").build();
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn default_unit_feeds_the_tracker() {
        let file = toml("[indent]\ndefault_unit = \"    \"\n");
        let config = Loader::new().with_file(file.path()).build().unwrap();
        let tracker = config.indent.tracker().unwrap();
        assert_eq!(tracker.indented("x", 2), "        x");
        assert_eq!(tracker.compute_level("        x"), Ok(2));
    }

    #[test]
    fn unusable_default_unit_is_rejected() {
        let err = Loader::new()
            .set_override("indent.default_unit", "->")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("indent.default_unit"));
    }
}
