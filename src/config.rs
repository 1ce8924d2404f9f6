//! Configuration file schema and discovery.
//!
//! Every section is optional; a missing file means defaults throughout.
//!
//! ```yaml
//! framework:
//!   package: express
//!   factory: express
//!   router_factories: [express.Router, Router]
//! walk:
//!   exclude: ["**/node_modules", "**/dist"]
//! documenter:
//!   model: gpt-4
//!   timeout_secs: 120
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::endpoints::Framework;

/// File names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["docsmith.yaml", ".docsmith.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub framework: Framework,
    pub walk: WalkConfig,
    pub documenter: DocumenterConfig,
}

/// Directory walk settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// File names treated as package manifests.
    pub manifest_names: Vec<String>,
    /// Glob patterns for directories that are never descended into.
    pub exclude: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            manifest_names: vec!["package.json".to_string()],
            exclude: vec![
                "**/node_modules".to_string(),
                "**/bower_components".to_string(),
                "**/.git".to_string(),
            ],
        }
    }
}

/// Settings for the chat-completions documenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumenterConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for DocumenterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load the explicit file, or the first discovered one, or defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(Path::new("."), user_config_dir().as_deref()),
        };
        let config = match &path {
            Some(p) => Config::parse_file(p)?,
            None => Config::default(),
        };
        config.validate()?;
        Ok((config, path))
    }

    /// Check the parts of the config that can be wrong without failing to parse.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.framework.package.trim().is_empty() {
            anyhow::bail!("framework.package must not be empty");
        }
        if self.framework.factory.trim().is_empty() {
            anyhow::bail!("framework.factory must not be empty");
        }
        if self.walk.manifest_names.is_empty() {
            anyhow::bail!("walk.manifest_names must list at least one file name");
        }
        for pattern in &self.walk.exclude {
            globset::Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid walk.exclude pattern {:?}: {}", pattern, e))?;
        }
        if self.documenter.timeout_secs == 0 {
            anyhow::bail!("documenter.timeout_secs must be positive");
        }
        Ok(())
    }
}

/// First config file in `dir`, then in `user_dir`.
pub fn discover(dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = DEFAULT_CONFIG_NAMES.iter().map(|name| dir.join(name)).collect::<Vec<_>>();
    if let Some(user_dir) = user_dir {
        candidates.push(user_dir.join("config.yaml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "docsmith").map(|d| d.config_dir().to_path_buf())
}
