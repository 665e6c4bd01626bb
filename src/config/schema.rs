//! Configuration schema for `palrip.toml`
//!
//! Every section and field is optional; missing values take the defaults
//! shown below.
//!
//! ```toml
//! [input]
//! extensions = ["img"]
//! recursive = true
//!
//! [output]
//! dir = "out"
//!
//! [decode]
//! policy = "direct"
//!
//! [render]
//! scale = 1
//! jobs = 0
//! ```

use crate::policy::DecodePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted upscale factor.
pub const MAX_SCALE: u8 = 16;

/// Input discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Container file extensions searched for in directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    #[serde(default = "default_true")]
    pub recursive: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["img".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { extensions: default_extensions(), recursive: true }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory; each container gets a subdirectory named after its file
    #[serde(default = "default_out")]
    pub dir: PathBuf,
}

fn default_out() -> PathBuf {
    PathBuf::from("out")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_out() }
    }
}

/// Decode settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub policy: DecodePolicy,
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Integer nearest-neighbour upscale
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Parallel jobs, 0 for available parallelism
    #[serde(default)]
    pub jobs: usize,
}

fn default_scale() -> u8 {
    1
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1, jobs: 0 }
    }
}

/// Complete palrip.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalripConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "palrip.toml: '{}' {}", self.field, self.message)
    }
}

impl PalripConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.input.extensions.is_empty() {
            errors.push(ConfigValidationError {
                field: "input.extensions".to_string(),
                message: "must contain at least one extension".to_string(),
            });
        }
        for (i, ext) in self.input.extensions.iter().enumerate() {
            if ext.is_empty() || ext.contains(['/', '\\', '*', '?', '[', ']']) {
                errors.push(ConfigValidationError {
                    field: format!("input.extensions[{}]", i),
                    message: format!("'{}' is not a plain file extension", ext),
                });
            }
        }

        if self.output.dir.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "output.dir".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: PalripConfig = toml::from_str("").unwrap();
        assert_eq!(config, PalripConfig::default());
        assert_eq!(config.input.extensions, vec!["img".to_string()]);
        assert!(config.input.recursive);
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.decode.policy, DecodePolicy::Direct);
        assert_eq!(config.render.scale, 1);
        assert_eq!(config.render.jobs, 0);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[input]
extensions = ["img", "bin"]
recursive = false

[output]
dir = "extracted"

[decode]
policy = "heuristic"

[render]
scale = 4
jobs = 2
"#;
        let config: PalripConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.input.extensions.len(), 2);
        assert!(!config.input.recursive);
        assert_eq!(config.output.dir, PathBuf::from("extracted"));
        assert_eq!(config.decode.policy, DecodePolicy::Heuristic);
        assert_eq!(config.render.scale, 4);
        assert_eq!(config.render.jobs, 2);
        assert!(config.is_valid());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: Result<PalripConfig, _> = toml::from_str("[decode]\npolicy = \"guess\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let toml = r#"
[input]
extensions = ["img", "*.bin"]

[output]
dir = ""

[render]
scale = 17
"#;
        let config: PalripConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["input.extensions[1]", "output.dir", "render.scale"]);
    }

    #[test]
    fn test_empty_extensions_invalid() {
        let config: PalripConfig = toml::from_str("[input]\nextensions = []\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("input.extensions"));
    }

    #[test]
    fn test_scale_zero_invalid() {
        let config: PalripConfig = toml::from_str("[render]\nscale = 0\n").unwrap();
        assert!(!config.is_valid());
    }
}
