//! Generator configuration.
//!
//! Settings are layered: built-in defaults, then `structgen.toml`, then
//! environment variables, then command-line flags (applied by the CLI).
//!
//! ```toml
//! # structgen.toml
//! suffix = "_generated"
//! extension = "go"
//! formatter = ["goimports", "-w"]
//! formatter_timeout_secs = 30
//! exclude_dirs = [".git", "vendor", "node_modules", "testdata"]
//! ```
//!
//! ## Environment Variables
//!
//! - `STRUCTGEN_FORMATTER` - formatter command line, split on whitespace; an
//!   empty value disables formatting
//! - `STRUCTGEN_SUFFIX` - artifact suffix

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the scanned root when no config is given.
pub const CONFIG_FILE_NAME: &str = "structgen.toml";

/// Settings for one generator run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Appended to the origin stem to name the artifact
    pub suffix: String,
    /// Extension of source files to scan (without the dot)
    pub extension: String,
    /// Formatter argv; the artifact path is appended. Empty disables formatting.
    pub formatter: Vec<String>,
    /// Kill the formatter after this many seconds
    pub formatter_timeout_secs: Option<u64>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            suffix: "_generated".to_string(),
            extension: "go".to_string(),
            formatter: vec!["goimports".to_string(), "-w".to_string()],
            formatter_timeout_secs: None,
            exclude_dirs: [".git", "vendor", "node_modules", "testdata"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    /// Load a config file. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GeneratorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load the config for a run rooted at `root`, then apply
    /// environment overrides.
    ///
    /// An explicit path must exist; otherwise `structgen.toml` in `root` is
    /// used when present, and the defaults when not.
    pub fn resolve(explicit_path: Option<&Path>, root: &Path) -> anyhow::Result<Self> {
        let mut config = match resolve_config_path(explicit_path, root)? {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                GeneratorConfig::load(&path)?
            }
            None => GeneratorConfig::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `STRUCTGEN_*` overrides read through `lookup`.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(formatter) = lookup("STRUCTGEN_FORMATTER") {
            self.formatter = split_command(&formatter);
        }
        if let Some(suffix) = lookup("STRUCTGEN_SUFFIX") {
            if !suffix.is_empty() {
                self.suffix = suffix;
            }
        }
    }

    /// Reject settings that would make the run overwrite its own inputs.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.suffix.is_empty() {
            anyhow::bail!("suffix must not be empty: artifacts would overwrite their sources");
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            anyhow::bail!(
                "extension must be given without a leading dot, got {:?}",
                self.extension
            );
        }
        Ok(())
    }

    pub fn formatter_timeout(&self) -> Option<Duration> {
        self.formatter_timeout_secs.map(Duration::from_secs)
    }
}

/// Split a command line on whitespace.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

/// `structgen.toml` in `root`, if it exists.
pub fn auto_detect_config_path(root: &Path) -> Option<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    path.is_file().then_some(path)
}

/// Resolve the config path.
///
/// Priority:
/// 1. Explicitly provided path (via CLI), which must exist
/// 2. Auto-detected in the root
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, root: &Path) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }
    Ok(auto_detect_config_path(root))
}
