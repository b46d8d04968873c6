//! # Configuration Management
//!
//! This module handles loading and saving CLI configuration and deciding
//! which routing rule set a command runs with.
//!
//! ## Configuration File Location
//!
//! All platforms: `$XDG_CONFIG_HOME/supportroute/config.json`, falling back to
//! `$HOME/.config/supportroute/config.json`.
//!
//! ## Rule Set Resolution
//!
//! 1. `--rules <FILE>` on the command line
//! 2. `SUPPORTROUTE_RULES` environment variable
//! 3. `rules_path` in the config file
//! 4. The built-in rule set

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use supportroute_rag::{Router, RouterError, load_rules};

/// Environment variable for overriding the rule file
pub const RULES_ENV_VAR: &str = "SUPPORTROUTE_RULES";

/// CLI configuration
///
/// # Example
///
/// ```rust
/// use supportroute::config::Config;
///
/// let config = Config::default().with_rules_path("/etc/supportroute/rules.toml");
/// assert!(config.rules_path.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rule file used when `--rules` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,
    /// Channel attached to queries when `--channel` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_channel: Option<String>,
}

impl Config {
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = Some(path.into());
        self
    }

    pub fn with_default_channel(mut self, channel: impl Into<String>) -> Self {
        self.default_channel = Some(channel.into());
        self
    }

    /// Load configuration from the default config file, or defaults if absent.
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(&config_path()?)
    }

    /// Load configuration from `path`, or defaults if the file is absent.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Loaded or default configuration
    /// * `Err(_)` - The file exists but is unreadable or invalid
    pub fn load_or_default_from(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the default config file
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Where the active rule set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// `--rules` flag
    Flag(PathBuf),
    /// `SUPPORTROUTE_RULES`
    Env(PathBuf),
    /// `rules_path` in the config file
    ConfigFile(PathBuf),
    BuiltIn,
}

impl RulesSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            RulesSource::Flag(p) | RulesSource::Env(p) | RulesSource::ConfigFile(p) => Some(p),
            RulesSource::BuiltIn => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RulesSource::Flag(p) => format!("{} (--rules)", p.display()),
            RulesSource::Env(p) => format!("{} (${})", p.display(), RULES_ENV_VAR),
            RulesSource::ConfigFile(p) => format!("{} (config)", p.display()),
            RulesSource::BuiltIn => "built-in rules".to_string(),
        }
    }

    /// Build a router over this source's rules.
    ///
    /// The rule set is read once here and never reloaded.
    pub fn load_router(&self) -> Result<Router, RouterError> {
        match self.path() {
            Some(path) => Router::new(load_rules(path)?),
            None => Ok(Router::with_default_rules()),
        }
    }
}

/// Resolve the rule set source from its inputs, highest priority first.
pub fn resolve_rules_source(
    flag: Option<&Path>,
    env_value: Option<&str>,
    config: Option<&Config>,
) -> RulesSource {
    if let Some(path) = flag {
        return RulesSource::Flag(path.to_path_buf());
    }
    if let Some(value) = env_value.map(str::trim).filter(|v| !v.is_empty()) {
        return RulesSource::Env(PathBuf::from(value));
    }
    if let Some(path) = config.and_then(|c| c.rules_path.as_ref()) {
        return RulesSource::ConfigFile(path.clone());
    }
    RulesSource::BuiltIn
}

/// Resolve the rule set source using the process environment.
pub fn rules_source(flag: Option<&Path>, config: Option<&Config>) -> RulesSource {
    let env_value = std::env::var(RULES_ENV_VAR).ok();
    resolve_rules_source(flag, env_value.as_deref(), config)
}

/// Get the path to the configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs_config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("supportroute").join("config.json"))
}

/// Get the config directory
///
/// Uses `$HOME/.config` on all platforms for consistency.
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .or_else(|| std::env::var("USERPROFILE").ok())
                .map(|h| PathBuf::from(h).join(".config"))
        })
}
