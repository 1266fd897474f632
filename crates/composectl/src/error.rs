//! Error types for composectl
//!
//! Every failure ends up as a [`ComposeCtlError`], printed to stderr as a
//! cargo-style diagnostic with a few tips where they help.

use colored::Colorize;
use composectl_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Authentication failed (HTTP 401): Unauthorized
///
///   tip: check that COMPOSEAPITOKEN or the profile token is set
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Render without colors
    pub fn render_plain(&self) -> String {
        let mut out = format!("error: {}\n", self.message);
        if let Some(detail) = &self.detail {
            out.push_str(&format!("  {}\n", detail));
        }
        for (description, commands) in &self.tips {
            out.push_str(&format!("\n  tip: {}\n", description));
            for cmd in commands {
                out.push_str(&format!("      {}\n", cmd));
            }
        }
        out
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the composectl application
#[derive(Error, Debug)]
pub enum ComposeCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Authentication failed (HTTP {status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Unexpected response from the API: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for composectl operations
pub type Result<T> = std::result::Result<T, ComposeCtlError>;

impl ComposeCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ComposeCtlError::ProfileNotFound { name } => vec![
                "List available profiles: composectl profile list".to_string(),
                format!("Create profile '{}': composectl profile set {}", name, name),
            ],
            ComposeCtlError::AuthenticationFailed { .. } => vec![
                "Set COMPOSEAPITOKEN or pass --api-token".to_string(),
                "Check the profile token: composectl profile show <profile>".to_string(),
            ],
            ComposeCtlError::ApiError { status: 404, .. } => vec![
                "Verify the resource ID is correct".to_string(),
                "List resources to find the ID: composectl teams, composectl deployments"
                    .to_string(),
            ],
            ComposeCtlError::ApiError { status: 400 | 422, .. } => {
                vec!["Check the arguments: composectl <command> --help".to_string()]
            }
            ComposeCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the API URL: --api-url, COMPOSE_API_URL or the profile's api_url"
                    .to_string(),
            ],
            ComposeCtlError::InvalidInput { .. } => {
                vec!["Check the command syntax: composectl <command> --help".to_string()]
            }
            ComposeCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Build the diagnostic for this error
    pub fn diagnostic(&self) -> CliDiagnostic {
        let mut diag = CliDiagnostic::error(&self.to_string());
        if let ComposeCtlError::AuthenticationFailed { .. } = self {
            diag = diag.detail("The API rejected the bearer token.");
        }
        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }
        diag
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        self.diagnostic().print();
    }
}

impl From<CoreError> for ComposeCtlError {
    fn from(err: CoreError) -> Self {
        let unauthorized = err.is_unauthorized();
        match err {
            CoreError::Api { status, message } if unauthorized => {
                ComposeCtlError::AuthenticationFailed { status, message }
            }
            CoreError::Api { status, message } => ComposeCtlError::ApiError { status, message },
            CoreError::Transport(e) => ComposeCtlError::ConnectionError {
                message: e.to_string(),
            },
            CoreError::Decode(e) => ComposeCtlError::InvalidResponse {
                message: e.to_string(),
            },
            err @ CoreError::MissingBody { .. } => ComposeCtlError::InvalidResponse {
                message: err.to_string(),
            },
        }
    }
}

impl From<ConfigError> for ComposeCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => ComposeCtlError::ProfileNotFound { name },
            other => ComposeCtlError::Config(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ComposeCtlError {
    fn from(err: serde_json::Error) -> Self {
        ComposeCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for ComposeCtlError {
    fn from(err: std::io::Error) -> Self {
        ComposeCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for ComposeCtlError {
    fn from(err: anyhow::Error) -> Self {
        ComposeCtlError::Config(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_authentication_failed() {
        let err: ComposeCtlError = CoreError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            ComposeCtlError::AuthenticationFailed { status: 401, .. }
        ));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_missing_body_maps_to_invalid_response() {
        let err: ComposeCtlError = CoreError::MissingBody {
            operation: "remove-user",
        }
        .into();
        assert!(matches!(err, ComposeCtlError::InvalidResponse { .. }));
        assert!(err.to_string().contains("'remove-user' returned no body"));
    }

    #[test]
    fn test_not_found_keeps_status_and_message() {
        let err: ComposeCtlError = CoreError::Api {
            status: 404,
            message: "team not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API error (HTTP 404): team not found");
        assert!(err.suggestions()[0].contains("resource ID"));
    }

    #[test]
    fn test_decode_error_maps_to_invalid_response() {
        let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err: ComposeCtlError = CoreError::Decode(decode).into();
        assert!(matches!(err, ComposeCtlError::InvalidResponse { .. }));
    }

    #[test]
    fn test_profile_not_found_from_config() {
        let err: ComposeCtlError = ConfigError::ProfileNotFound {
            name: "work".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Profile 'work' not found");
        assert!(
            err.suggestions()
                .iter()
                .any(|s| s.contains("composectl profile set work"))
        );
    }

    #[test]
    fn test_diagnostic_renders_tips() {
        let err = ComposeCtlError::ConnectionError {
            message: "connection refused".to_string(),
        };
        let rendered = err.diagnostic().render_plain();
        assert!(rendered.starts_with("error: Connection error: connection refused\n"));
        assert!(rendered.contains("tip: Check network connectivity"));
    }

    #[test]
    fn test_diagnostic_detail_line() {
        let rendered = CliDiagnostic::error("boom")
            .detail("more context")
            .tip("try this", &["composectl teams"])
            .render_plain();
        assert_eq!(
            rendered,
            "error: boom\n  more context\n\n  tip: try this\n      composectl teams\n"
        );
    }
}
