//! Profile management command implementations

use anyhow::Context;
use composectl_core::config::CredentialStore;
use composectl_core::{Config, Profile};
use serde_json::json;
use std::io::{self, Write};
use tracing::{debug, trace};

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{ComposeCtlError, Result as CliResult};
use crate::output::print_value;

pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            api_token,
            api_url,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            #[cfg(feature = "secure-storage")]
            let use_keyring = *use_keyring;
            #[cfg(not(feature = "secure-storage"))]
            let use_keyring = false;

            handle_set(
                conn_mgr,
                name,
                api_token.as_deref(),
                api_url.as_deref(),
                use_keyring,
            )
        }
        Remove { name, yes } => handle_remove(conn_mgr, name, *yes),
        Default { name } => handle_default(conn_mgr, name),
    }
}

/// Masked view of a stored token
fn token_preview(profile: &Profile) -> String {
    match profile.api_token.as_deref() {
        None => "not set".to_string(),
        Some(_) if profile.uses_keyring() => "stored in OS keyring".to_string(),
        Some(token) => {
            let prefix: String = token.chars().take(4).collect();
            format!("{}...", prefix)
        }
    }
}

fn profile_json(config: &Config, name: &str, profile: &Profile) -> serde_json::Value {
    json!({
        "name": name,
        "api_url": profile.api_url(),
        "token": token_preview(profile),
        "is_default": config.default_profile.as_deref() == Some(name),
    })
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let config = &conn_mgr.config;
    let profiles = config.list_profiles();
    trace!("Found {} profiles", profiles.len());

    if output_format != OutputFormat::Auto {
        let list: Vec<_> = profiles
            .iter()
            .map(|(name, profile)| profile_json(config, name, profile))
            .collect();
        return print_value(list, output_format, None);
    }

    if profiles.is_empty() {
        println!("No profiles configured.");
        println!("Use 'composectl profile set <name>' to create one.");
        return Ok(());
    }

    for (name, profile) in profiles {
        let marker = if config.default_profile.as_deref() == Some(name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}  {}", marker, name, profile.api_url());
    }
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = match &conn_mgr.config_path {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    match output_format {
        OutputFormat::Auto => println!("{}", config_path.display()),
        _ => print_value(
            json!({ "config_path": config_path.display().to_string() }),
            output_format,
            None,
        )?,
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let config = &conn_mgr.config;
    let profile = config
        .profiles
        .get(name)
        .ok_or_else(|| ComposeCtlError::ProfileNotFound { name: name.into() })?;

    if output_format != OutputFormat::Auto {
        return print_value(profile_json(config, name, profile), output_format, None);
    }

    println!("Profile: {}", name);
    println!("API URL: {}", profile.api_url());
    println!("Token: {}", token_preview(profile));
    if config.default_profile.as_deref() == Some(name) {
        println!("Default: yes");
    }
    Ok(())
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    api_token: Option<&str>,
    api_url: Option<&str>,
    use_keyring: bool,
) -> CliResult<()> {
    debug!("Setting profile: {}", name);

    let token = match api_token {
        Some(token) => token.to_string(),
        None => rpassword::prompt_password("Enter API token: ")
            .context("Failed to read API token")?,
    };
    if token.is_empty() {
        return Err(ComposeCtlError::InvalidInput {
            message: "API token must not be empty".to_string(),
        });
    }

    let stored_token = store_token(name, &token, use_keyring)?;

    let mut config = conn_mgr.config.clone();
    let existing = config.profiles.get(name).cloned();
    let api_url = api_url
        .map(str::to_string)
        .or_else(|| existing.as_ref().and_then(|p| p.api_url.clone()));

    config.set_profile(name.to_string(), Profile::new(Some(stored_token), api_url));
    if config.default_profile.is_none() && config.profiles.len() == 1 {
        config.default_profile = Some(name.to_string());
    }
    conn_mgr.save_config(&config)?;

    if existing.is_some() {
        println!("Profile '{}' updated.", name);
    } else {
        println!("Profile '{}' created.", name);
    }
    if config.default_profile.as_deref() == Some(name) {
        println!("'{}' is the default profile.", name);
    }
    Ok(())
}

#[cfg(feature = "secure-storage")]
fn store_token(name: &str, token: &str, use_keyring: bool) -> CliResult<String> {
    if !use_keyring {
        return Ok(token.to_string());
    }
    let reference = CredentialStore::keyring()
        .store_credential(&format!("{}-api-token", name), token)
        .context("Failed to store API token in keyring")?;
    println!("Token stored securely in OS keyring");
    Ok(reference)
}

#[cfg(not(feature = "secure-storage"))]
fn store_token(_name: &str, token: &str, _use_keyring: bool) -> CliResult<String> {
    Ok(token.to_string())
}

fn confirm(prompt: &str) -> CliResult<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str, yes: bool) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    let Some(profile) = conn_mgr.config.profiles.get(name) else {
        return Err(ComposeCtlError::ProfileNotFound { name: name.into() });
    };

    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
    if is_default {
        println!("Warning: '{}' is the default profile.", name);
    }

    if !yes && !confirm(&format!("Are you sure you want to remove profile '{}'?", name))? {
        println!("Profile removal cancelled.");
        return Ok(());
    }

    if profile.uses_keyring()
        && let Some(token) = &profile.api_token
    {
        CredentialStore::new()
            .delete_credential(token)
            .context("Failed to remove API token from keyring")?;
    }

    let mut config = conn_mgr.config.clone();
    config.remove_profile(name);
    conn_mgr.save_config(&config)?;

    if is_default {
        println!("Default profile cleared.");
    }
    println!("Profile '{}' removed successfully.", name);
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Setting default profile: {}", name);

    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(ComposeCtlError::ProfileNotFound { name: name.into() });
    }

    let mut config = conn_mgr.config.clone();
    config.default_profile = Some(name.to_string());
    conn_mgr.save_config(&config)?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}
