//! Connection management for the Compose API client

use crate::error::Result as CliResult;
use anyhow::Context;
use composectl_core::{ClientConfig, ComposeClient, Config, DEFAULT_API_URL, Dispatcher};
use tracing::{debug, info, trace};

/// Explicit connection settings from the command line (or their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub profile: Option<String>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<std::path::PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<std::path::PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Resolve the client configuration.
    ///
    /// Each setting is taken from the first source that has it: the
    /// override (flag or environment), the selected profile, the default.
    /// A missing token is not an error; the request goes out with an empty
    /// bearer token and the server decides.
    pub fn client_config(&self, overrides: &ConnectionOverrides) -> CliResult<ClientConfig> {
        // Both settings given explicitly: the profile file is not consulted
        let profile = if overrides.api_url.is_some() && overrides.api_token.is_some() {
            None
        } else {
            self.config.active_profile(overrides.profile.as_deref())?
        };

        if let Some((name, _)) = &profile {
            info!("Using profile: {}", name);
        }

        let api_url = match (&overrides.api_url, &profile) {
            (Some(url), _) => {
                debug!("API URL from command line or COMPOSE_API_URL");
                url.clone()
            }
            (None, Some((_, p))) => p.api_url().to_string(),
            (None, None) => DEFAULT_API_URL.to_string(),
        };

        let api_token = match (&overrides.api_token, &profile) {
            (Some(token), _) => {
                debug!("API token from command line or COMPOSEAPITOKEN");
                Some(token.clone())
            }
            (None, Some((_, p))) => p.resolve_api_token()?,
            (None, None) => None,
        };

        if api_token.is_none() {
            debug!("No API token configured, sending an empty bearer token");
        }
        trace!("API URL: {}", api_url);

        let mut config = ClientConfig::new(api_url);
        config.api_token = api_token;
        Ok(config)
    }

    /// Create an HTTP client with the resolved configuration
    pub fn create_client(&self, overrides: &ConnectionOverrides) -> CliResult<ComposeClient> {
        let config = self.client_config(overrides)?;
        debug!("Creating Compose client for {}", config.base_url);
        Ok(ComposeClient::new(config)?)
    }

    /// Create a dispatcher around a freshly built client
    pub fn create_dispatcher(&self, overrides: &ConnectionOverrides) -> CliResult<Dispatcher> {
        Ok(Dispatcher::new(self.create_client(overrides)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use composectl_core::Profile;

    fn manager_with(profiles: &[(&str, Option<&str>, Option<&str>)]) -> ConnectionManager {
        let mut config = Config::default();
        for (name, token, url) in profiles {
            config.set_profile(
                name.to_string(),
                Profile::new(token.map(str::to_string), url.map(str::to_string)),
            );
        }
        ConnectionManager::with_config_path(config, None)
    }

    #[test]
    fn test_defaults_without_profiles() {
        let mgr = manager_with(&[]);
        let config = mgr.client_config(&ConnectionOverrides::default()).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_profile_supplies_settings() {
        let mgr = manager_with(&[("work", Some("tok"), Some("http://localhost:1234"))]);
        let config = mgr.client_config(&ConnectionOverrides::default()).unwrap();
        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.api_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_overrides_win_over_profile() {
        let mgr = manager_with(&[("work", Some("tok"), Some("http://localhost:1234"))]);
        let overrides = ConnectionOverrides {
            profile: None,
            api_url: None,
            api_token: Some("flag-token".to_string()),
        };
        let config = mgr.client_config(&overrides).unwrap();
        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.api_token.as_deref(), Some("flag-token"));
    }

    #[test]
    fn test_explicit_unknown_profile_errors() {
        let mgr = manager_with(&[("work", Some("tok"), None)]);
        let overrides = ConnectionOverrides {
            profile: Some("home".to_string()),
            ..Default::default()
        };
        let err = mgr.client_config(&overrides).unwrap_err();
        assert_eq!(err.to_string(), "Profile 'home' not found");
    }

    #[test]
    fn test_full_overrides_skip_profile_resolution() {
        let mut mgr = manager_with(&[]);
        mgr.config.default_profile = Some("gone".to_string());
        let overrides = ConnectionOverrides {
            profile: None,
            api_url: Some("http://127.0.0.1:9".to_string()),
            api_token: Some("t".to_string()),
        };
        let config = mgr.client_config(&overrides).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9");
    }
}
