//! Importer configuration (ts-importer.toml) parsing and types.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::emitter::EmitOptions;

/// File looked up in the current directory when no config path is given.
pub const CONFIG_FILE: &str = "ts-importer.toml";

/// Package used when neither the command line nor the config names one.
pub const DEFAULT_PACKAGE: &str = "importedjs";

/// Errors that can occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration structure for ts-importer.toml.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImporterConfig {
    /// Dotted package the declarations are emitted into.
    pub package: Option<String>,
    /// Output formatting.
    #[serde(default)]
    pub emit: EmitConfig,
}

/// `[emit]` section.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EmitConfig {
    /// Spaces per nesting level.
    pub indent: Option<usize>,
    /// Emit the `js` imports header.
    pub header: Option<bool>,
}

impl ImporterConfig {
    /// Load ts-importer.toml from the current directory.
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The output package, defaulting to `importedjs`.
    pub fn package(&self) -> &str {
        self.package.as_deref().unwrap_or(DEFAULT_PACKAGE)
    }

    /// Emitter options with unset keys left at their defaults.
    pub fn emit_options(&self) -> EmitOptions {
        let defaults = EmitOptions::default();
        EmitOptions {
            indent: self.emit.indent.unwrap_or(defaults.indent),
            header: self.emit.header.unwrap_or(defaults.header),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
package = "com.example.facades"

[emit]
indent = 4
header = false
"#;
        let config = ImporterConfig::parse(toml).unwrap();
        assert_eq!(config.package(), "com.example.facades");
        assert_eq!(
            config.emit_options(),
            EmitOptions {
                indent: 4,
                header: false
            }
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ImporterConfig::parse("").unwrap();
        assert_eq!(config.package(), DEFAULT_PACKAGE);
        assert_eq!(config.emit_options(), EmitOptions::default());
    }

    #[test]
    fn test_partial_emit_section() {
        let config = ImporterConfig::parse("[emit]\nindent = 3\n").unwrap();
        assert_eq!(config.emit_options().indent, 3);
        assert!(config.emit_options().header);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ImporterConfig::parse("pakage = \"typo\"").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "package = \"facades\"\n").unwrap();

        let config = ImporterConfig::load_from_path(&path).unwrap();
        assert_eq!(config.package(), "facades");

        fs::write(&path, "package = [").unwrap();
        let err = ImporterConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = ImporterConfig::load_from_path(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
