//! Configuration and profile management for composectl
//!
//! Profiles hold the API token and, optionally, a non-default API URL. The
//! file is TOML and lives in the platform config directory unless a path is
//! given explicitly.
//!
//! # Features
//!
//! - Multiple named profiles with a default
//! - Secure token storage using the OS keyring (optional)
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

// The config subsystem keeps its main type in `config::config`
#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

pub use config::{Config, Profile};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
