//! Configuration management for composectl
//!
//! Handles configuration loading from files and environment variable
//! expansion. Configuration is stored in TOML format with support for
//! multiple named profiles.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::client::DEFAULT_API_URL;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    /// Bearer token, a `keyring:` reference, or absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// API base URL; the public endpoint when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Profile {
    pub fn new(api_token: Option<String>, api_url: Option<String>) -> Self {
        Self { api_token, api_url }
    }

    /// API base URL for this profile
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Whether the token lives in the OS keyring
    pub fn uses_keyring(&self) -> bool {
        self.api_token
            .as_deref()
            .is_some_and(CredentialStore::is_keyring_reference)
    }

    /// Get the resolved token (with keyring support)
    pub fn resolve_api_token(&self) -> Result<Option<String>> {
        let Some(token) = &self.api_token else {
            return Ok(None);
        };
        let store = CredentialStore::new();
        store
            .get_credential(token, None)
            .map(Some)
            .map_err(|e| ConfigError::CredentialError(format!("Failed to resolve API token: {}", e)))
    }
}

impl Config {
    /// Resolve which profile applies.
    ///
    /// Resolution order:
    /// 1. Explicitly specified profile (must exist)
    /// 2. `default_profile` (must exist)
    /// 3. First profile alphabetically
    ///
    /// Returns `None` when no profiles are configured at all.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<Option<String>> {
        if let Some(name) = explicit_profile.or(self.default_profile.as_deref()) {
            if !self.profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            return Ok(Some(name.to_string()));
        }

        Ok(self.list_profiles().first().map(|(name, _)| (*name).clone()))
    }

    /// Resolve the profile and return it alongside its name
    pub fn active_profile(&self, explicit_profile: Option<&str>) -> Result<Option<(String, &Profile)>> {
        Ok(self
            .resolve_profile(explicit_profile)?
            .and_then(|name| self.profiles.get(&name).map(|p| (name, p))))
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, ~/.config/composectl/config.toml is preferred when it (or its
    /// directory) exists, falling back to the standard Application Support path.
    ///
    /// On Linux: ~/.config/composectl/config.toml
    /// On Windows: %APPDATA%\compose\composectl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("composectl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path
                        .parent()
                        .map(|p| p.exists())
                        .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("io", "compose", "composectl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is so unused profiles don't break loading.
    ///
    /// Example:
    /// ```toml
    /// api_token = "${COMPOSEAPITOKEN}"
    /// api_url = "${COMPOSE_API_URL:-https://api.compose.io/2016-07}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
