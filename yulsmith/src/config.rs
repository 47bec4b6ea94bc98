//! Fuzzer Configuration
//!
//! Options for the mutation engine and the two source emitters. Every
//! section is `#[serde(default)]`, so a config file only needs to name the
//! values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzConfig {
    /// Mutation engine options.
    pub mutation: MutationConfig,

    /// Yul emitter options.
    pub emit: EmitConfig,

    /// Program converter options.
    pub program: ProgramConfig,
}

/// Mutation engine options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Log a before/after snapshot of the node for every operator that fires.
    pub log_changes: bool,
}

/// Yul emitter options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Indentation width in spaces.
    pub indent_width: usize,

    /// Use tabs instead of spaces for indentation.
    pub use_tabs: bool,

    /// Name of the object wrapping the emitted code block.
    pub object_name: String,

    /// Iteration bound of bounded for loops.
    pub max_bounded_iterations: u32,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            use_tabs: false,
            object_name: "object0".to_string(),
            max_bounded_iterations: 16,
        }
    }
}

impl EmitConfig {
    /// Returns the indentation string based on configuration.
    pub fn indent_str(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.indent_width)
        }
    }

    /// Returns indentation at the given level.
    pub fn indent_at(&self, level: usize) -> String {
        self.indent_str().repeat(level)
    }
}

/// Program converter options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Maximum number of contract instances declared in the generated test
    /// function; more locals than this hit "stack too deep".
    pub max_test_vars: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self { max_test_vars: 15 }
    }
}

impl FuzzConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the format by extension
    /// (`.json` is JSON, everything else is TOML).
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_toml_str(&source),
        }
    }

    /// Checks values that would make the emitters produce invalid text.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.emit.use_tabs && self.emit.indent_width == 0 {
            return Err(ConfigError::Invalid {
                message: "emit.indent_width must be positive".to_string(),
            });
        }
        if self.emit.max_bounded_iterations == 0 {
            return Err(ConfigError::Invalid {
                message: "emit.max_bounded_iterations must be positive".to_string(),
            });
        }
        let name = &self.emit.object_name;
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid_name {
            return Err(ConfigError::Invalid {
                message: format!("emit.object_name {:?} is not a valid object name", name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FuzzConfig::default();
        assert!(!config.mutation.log_changes);
        assert_eq!(config.emit.indent_width, 4);
        assert_eq!(config.emit.object_name, "object0");
        assert_eq!(config.program.max_test_vars, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FuzzConfig::from_toml_str(
            r#"
            [mutation]
            log_changes = true

            [emit]
            use_tabs = true
            "#,
        )
        .unwrap();
        assert!(config.mutation.log_changes);
        assert!(config.emit.use_tabs);
        assert_eq!(config.emit.indent_str(), "\t");
        assert_eq!(config.emit.max_bounded_iterations, 16);
    }

    #[test]
    fn test_rejects_empty_object_name() {
        let err = FuzzConfig::from_toml_str("[emit]\nobject_name = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_zero_loop_bound() {
        let err =
            FuzzConfig::from_json_str(r#"{"emit": {"max_bounded_iterations": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("max_bounded_iterations"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[program]\nmax_test_vars = 3").unwrap();
        let config = FuzzConfig::load(file.path()).unwrap();
        assert_eq!(config.program.max_test_vars, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FuzzConfig::load(Path::new("/nonexistent/yulsmith.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_indent_at() {
        let config = EmitConfig::default();
        assert_eq!(config.indent_at(2), "        ");
    }
}
