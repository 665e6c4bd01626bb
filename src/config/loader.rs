//! Configuration loading and discovery for `palrip.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PalripConfig;
use crate::policy::DecodePolicy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "palrip.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse palrip.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override decode policy
    pub policy: Option<DecodePolicy>,
    /// Override scale factor
    pub scale: Option<u8>,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Find palrip.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find palrip.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a palrip.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the defaults.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("project/palrip.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<PalripConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PalripConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PalripConfig = toml::from_str(&contents)?;
    validate(config)
}

fn validate(config: PalripConfig) -> Result<PalripConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no palrip.toml is found.
pub fn default_config() -> PalripConfig {
    PalripConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again, so an out-of-range `--scale` is
/// reported the same way as a bad config value.
pub fn merge_cli_overrides(mut config: PalripConfig, overrides: &CliOverrides) -> Result<PalripConfig, ConfigError> {
    if let Some(ref out) = overrides.out {
        config.output.dir = out.clone();
    }
    if let Some(policy) = overrides.policy {
        config.decode.policy = policy;
    }
    if let Some(scale) = overrides.scale {
        config.render.scale = scale;
    }
    if let Some(jobs) = overrides.jobs {
        config.render.jobs = jobs;
    }

    validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[output]\ndir = \"x\"");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"");

        let subdir = temp.path().join("data").join("arena");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[decode]
policy = "heuristic"

[render]
scale = 3
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.decode.policy, DecodePolicy::Heuristic);
        assert_eq!(config.render.scale, 3);
        assert_eq!(config.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[input]\nextensions = []\n[render]\nscale = 0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let overrides = CliOverrides {
            out: Some(PathBuf::from("dist")),
            policy: Some(DecodePolicy::Heuristic),
            scale: Some(2),
            jobs: Some(1),
        };

        let config = merge_cli_overrides(default_config(), &overrides).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert_eq!(config.decode.policy, DecodePolicy::Heuristic);
        assert_eq!(config.render.scale, 2);
        assert_eq!(config.render.jobs, 1);
    }

    #[test]
    fn test_merge_cli_overrides_empty_keeps_config() {
        let config = merge_cli_overrides(default_config(), &CliOverrides::default()).unwrap();
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_merge_cli_overrides_invalid_scale() {
        let overrides = CliOverrides { scale: Some(40), ..Default::default() };
        assert!(matches!(
            merge_cli_overrides(default_config(), &overrides),
            Err(ConfigError::Validation(_))
        ));
    }
}
