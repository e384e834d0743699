//! Bindforge Project Configuration
//!
//! Handles parsing and management of bindforge.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::codegen::{CodeGenOptions, Target};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "bindforge.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching bindforge.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BindforgeConfig {
    /// Where generated files go
    #[serde(default)]
    pub output: OutputConfig,

    /// Which surfaces to generate
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Formatting of generated code
    #[serde(default)]
    pub codegen: CodegenConfig,
}

impl BindforgeConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: BindforgeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Enabled targets in canonical order.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        if self.targets.c {
            targets.push(Target::C);
        }
        if self.targets.dynamic {
            targets.push(Target::Dynamic);
        }
        if self.targets.cpp {
            targets.push(Target::Cpp);
        }
        targets
    }

    /// Generator options from the `[codegen]` section.
    pub fn to_options(&self) -> CodeGenOptions {
        CodeGenOptions {
            indent_size: self.codegen.indent_size,
            use_tabs: self.codegen.use_tabs,
            emit_comments: self.codegen.emit_comments,
        }
    }
}

/// Output location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Directory receiving the generated files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("bindings")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Surface selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetsConfig {
    #[serde(default = "default_true")]
    pub c: bool,

    #[serde(default = "default_true")]
    pub dynamic: bool,

    #[serde(default = "default_true")]
    pub cpp: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            c: true,
            dynamic: true,
            cpp: true,
        }
    }
}

/// Code formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodegenConfig {
    /// Spaces per indent level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Indent with tabs instead of spaces
    #[serde(default)]
    pub use_tabs: bool,

    /// Emit doxygen comments
    #[serde(default = "default_true")]
    pub emit_comments: bool,
}

fn default_indent_size() -> usize {
    4
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            use_tabs: false,
            emit_comments: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BindforgeConfig::default();
        assert_eq!(config.output.dir, PathBuf::from("bindings"));
        assert_eq!(config.targets(), Target::ALL.to_vec());
        assert_eq!(config.codegen.indent_size, 4);
        assert!(config.codegen.emit_comments);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[output]
dir = "generated"

[targets]
dynamic = false

[codegen]
use_tabs = true
emit_comments = false
"#;
        let config: BindforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("generated"));
        assert_eq!(config.targets(), vec![Target::C, Target::Cpp]);

        let options = config.to_options();
        assert!(options.use_tabs);
        assert!(!options.emit_comments);
        assert_eq!(options.indent_size, 4);
    }

    #[test]
    fn test_missing_file() {
        let result = BindforgeConfig::load(Path::new("/nonexistent/bindforge.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_save_and_find() {
        let dir = std::env::temp_dir().join(format!("bindforge-config-{}", std::process::id()));
        let nested = dir.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let mut config = BindforgeConfig::default();
        config.codegen.indent_size = 2;
        config.targets.cpp = false;
        config.save(&dir.join(CONFIG_FILE_NAME)).unwrap();

        let found = BindforgeConfig::find_and_load(&nested).unwrap();
        assert_eq!(found, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
