//! CLI configuration
//!
//! Optional JSON settings, looked up in order:
//!
//! 1. `--config FILE` (errors are fatal)
//! 2. `.cosmic_config.json` in the working directory
//! 3. `<user config dir>/cosmic-circle/config.json`
//!
//! A default location that exists but cannot be read or parsed is logged
//! and replaced by defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::ContentPack;
use crate::core::compatibility::Depth;
use crate::core::error::{CosmicError, Result, ResultExt};
use crate::core::forecast::DEFAULT_SPOTLIGHT_LIMIT;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".cosmic_config.json";

/// Settings loaded from `.cosmic_config.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default depth when the command line gives none
    #[serde(default)]
    pub depth: Depth,
    /// Content pack replacing the built-in set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_pack: Option<PathBuf>,
    /// Spotlights per forecast
    #[serde(default = "default_spotlight_limit")]
    pub spotlight_limit: usize,
}

fn default_spotlight_limit() -> usize {
    DEFAULT_SPOTLIGHT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: Depth::default(),
            content_pack: None,
            spotlight_limit: DEFAULT_SPOTLIGHT_LIMIT,
        }
    }
}

impl Config {
    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. Any failure is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(CosmicError::from)
            .context(format!("reading config {}", path.display()))?;
        Self::from_json(&contents).context(format!("parsing config {}", path.display()))
    }

    /// Load from the first default location that exists.
    pub fn load() -> Self {
        Self::load_from_paths(&Self::search_paths())
    }

    /// Load from the first existing path, falling back to defaults.
    pub fn load_from_paths(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.exists() {
                continue;
            }
            return match Self::from_file(path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unusable config");
                    Self::default()
                }
            };
        }
        Self::default()
    }

    /// Default lookup locations, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cosmic-circle").join("config.json"));
        }

        paths
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.spotlight_limit == 0 {
            return Err(CosmicError::invalid_config("spotlight_limit must be at least 1"));
        }
        Ok(())
    }

    /// The configured content pack, or the built-in one.
    ///
    /// Relative pack paths are resolved by the caller's working directory.
    pub fn content(&self) -> Result<ContentPack> {
        match &self.content_pack {
            Some(path) => ContentPack::from_file(path),
            None => Ok(ContentPack::builtin().clone()),
        }
    }

    /// Builder pattern: set depth
    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    /// Builder pattern: set content pack path
    pub fn with_content_pack(mut self, path: impl Into<PathBuf>) -> Self {
        self.content_pack = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.depth, Depth::SunOnly);
        assert_eq!(config.spotlight_limit, 3);
        assert!(config.content_pack.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"depth": "full_chart"}"#).unwrap();
        assert_eq!(config.depth, Depth::FullChart);
        assert_eq!(config.spotlight_limit, 3);
    }

    #[test]
    fn test_zero_spotlight_limit_rejected() {
        let err = Config::from_json(r#"{"spotlight_limit": 0}"#).unwrap_err();
        assert!(matches!(err, CosmicError::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_depth_rejected() {
        assert!(Config::from_json(r#"{"depth": "deep"}"#).is_err());
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn test_load_from_paths_first_existing_wins() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        fs::write(&second, r#"{"spotlight_limit": 5}"#).unwrap();

        let config = Config::load_from_paths(&[first.clone(), second.clone()]);
        assert_eq!(config.spotlight_limit, 5);

        fs::write(&first, r#"{"spotlight_limit": 2}"#).unwrap();
        let config = Config::load_from_paths(&[first, second]);
        assert_eq!(config.spotlight_limit, 2);
    }

    #[test]
    fn test_load_from_paths_malformed_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from_paths(&[path]), Config::default());
    }

    #[test]
    fn test_content_defaults_to_builtin() {
        let pack = Config::default().content().unwrap();
        assert_eq!(pack.version, ContentPack::builtin().version);
    }

    #[test]
    fn test_content_pack_path_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        fs::write(&path, ContentPack::empty("custom-1").to_json().unwrap()).unwrap();

        let config = Config::default().with_content_pack(&path);
        assert_eq!(config.content().unwrap().version, "custom-1");
    }
}
