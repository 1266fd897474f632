//! # composectl-core
//!
//! Shared engine for the `composectl` CLI: everything needed to turn a
//! command into one request against the Compose REST API and to turn the
//! response back into printable lines.
//!
//! ## Layers
//!
//! - [`client`] - explicit client configuration ([`ClientConfig`]) and the
//!   network seam ([`Transport`]), with [`HttpTransport`] as the reqwest-backed
//!   implementation
//! - [`operation`] - the fixed operation catalog; each [`Operation`] maps to
//!   exactly one [`ApiRequest`]
//! - [`dispatch`] - sends an operation through a [`ComposeClient`] and decides
//!   whether the body is parsed
//! - [`summary`] - renders a response as the human-readable summary lines
//! - [`models`] - lenient response models for the HAL documents the API returns
//! - [`config`] - profile file handling and credential resolution
//!
//! ## Example
//!
//! ```rust,no_run
//! use composectl_core::{ClientConfig, ComposeClient, Dispatcher, Operation, summarize};
//!
//! # async fn run() -> composectl_core::Result<()> {
//! let client = ComposeClient::new(ClientConfig::from_env())?;
//! let dispatcher = Dispatcher::new(client);
//!
//! let op = Operation::ListTeams;
//! let outcome = dispatcher.dispatch(&op).await?;
//! for line in summarize(&op, &outcome)? {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod operation;
pub mod summary;

pub use client::{
    ApiResponse, ClientConfig, ComposeClient, DEFAULT_API_URL, HttpTransport, PreparedRequest,
    TOKEN_ENV_VAR, Transport, URL_ENV_VAR,
};
pub use config::{Config, ConfigError, Profile};
pub use dispatch::{Dispatcher, Outcome};
pub use error::{CoreError, Result};
pub use operation::{ApiRequest, Method, Operation};
pub use summary::summarize;
