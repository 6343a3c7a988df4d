//! Configuration file management for planbook.
//!
//! Provides a TOML-based config file at `~/.config/planbook/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use planbook_core::generate::ClaudeCodeGenerator;
use planbook_store::StoreConfig;

pub const CLAUDE_BIN_ENV: &str = "PLANBOOK_CLAUDE_BIN";
pub const GENERATION_TIMEOUT_ENV: &str = "PLANBOOK_GENERATION_TIMEOUT";

pub const DEFAULT_CLAUDE_BINARY: &str = "claude";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Path to the `claude` binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_binary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the planbook config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/planbook` or
/// `~/.config/planbook`, never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("planbook");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("planbook")
}

/// Return the path to the planbook config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if there is one.
///
/// A missing file is `None`; a file that exists but cannot be parsed is an
/// error rather than being silently ignored.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    load_config_from(&path).map(Some)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Settings for the content generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub claude_binary: String,
    pub timeout: Duration,
    pub model: Option<String>,
}

impl GenerationSettings {
    pub fn generator(&self) -> ClaudeCodeGenerator {
        ClaudeCodeGenerator::with_binary(self.claude_binary.clone()).model(self.model.clone())
    }
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct PlanbookConfig {
    pub store: StoreConfig,
    pub generation: GenerationSettings,
}

impl PlanbookConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Data dir: `cli_data_dir` > `PLANBOOK_DATA_DIR` env > `store.data_dir` > XDG data dir
    /// - Claude binary: `PLANBOOK_CLAUDE_BIN` env > `generation.claude_binary` > `claude`
    /// - Timeout: `PLANBOOK_GENERATION_TIMEOUT` env > `generation.timeout_secs` > 120s
    pub fn resolve(cli_data_dir: Option<&Path>) -> Result<Self> {
        let file_config = load_config()?.unwrap_or_default();
        Self::resolve_with(cli_data_dir, file_config)
    }

    fn resolve_with(cli_data_dir: Option<&Path>, file_config: ConfigFile) -> Result<Self> {
        let ConfigFile { store, generation } = file_config;

        let data_dir = if let Some(dir) = cli_data_dir {
            dir.to_path_buf()
        } else if let Ok(dir) = std::env::var(StoreConfig::DATA_DIR_ENV) {
            PathBuf::from(dir)
        } else if let Some(dir) = store.data_dir {
            dir
        } else {
            StoreConfig::default_data_dir()
        };

        let claude_binary = std::env::var(CLAUDE_BIN_ENV)
            .ok()
            .or(generation.claude_binary)
            .unwrap_or_else(|| DEFAULT_CLAUDE_BINARY.to_string());

        let timeout_secs = match std::env::var(GENERATION_TIMEOUT_ENV) {
            Ok(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("{GENERATION_TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}")
            })?,
            Err(_) => generation
                .timeout_secs
                .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
        };

        Ok(Self {
            store: StoreConfig::new(data_dir),
            generation: GenerationSettings {
                claude_binary,
                timeout: Duration::from_secs(timeout_secs),
                model: generation.model,
            },
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
