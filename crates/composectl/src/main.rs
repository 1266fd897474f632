use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};
use composectl_core::{Config, Method};
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::{ConnectionManager, ConnectionOverrides};
use error::ComposeCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    let conn_mgr = match load_connection_manager(cli.config_file.as_deref()) {
        Ok(conn_mgr) => conn_mgr,
        Err(e) => {
            e.print_diagnostic();
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

/// Load configuration from the specified path or the default location
fn load_connection_manager(config_file: Option<&str>) -> Result<ConnectionManager, ComposeCtlError> {
    let (config, config_path) = if let Some(config_file) = config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    Ok(ConnectionManager::with_config_path(config, config_path))
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "composectl=warn,composectl_core=warn",
            1 => "composectl=info,composectl_core=info",
            2 => "composectl=debug,composectl_core=debug",
            _ => "composectl=trace,composectl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), ComposeCtlError> {
    // Log command execution with sanitized parameters
    trace!("Output: {:?}, query: {:?}", cli.output, cli.query);
    info!("Command: {}", format_command(&cli.command));

    let overrides = ConnectionOverrides {
        profile: cli.profile.clone(),
        api_url: cli.api_url.clone(),
        api_token: cli.api_token.clone(),
    };

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            match cli.output {
                cli::OutputFormat::Auto => {
                    println!("composectl {}", env!("CARGO_PKG_VERSION"));
                    Ok(())
                }
                format => output::print_value(
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "name": env!("CARGO_PKG_NAME"),
                    }),
                    format,
                    None,
                ),
            }
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }

        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, cli.output).await
        }

        Commands::Api { method, path, data } => {
            info!(
                "API call: {} {} {}",
                method,
                path,
                if data.is_some() { "with data" } else { "no data" }
            );
            execute_api_command(cli, conn_mgr, &overrides, *method, path, data.as_deref()).await
        }

        command => match command.operation() {
            Some(operation) => {
                let dispatcher = conn_mgr.create_dispatcher(&overrides)?;
                commands::resources::handle_operation(
                    &dispatcher,
                    &operation,
                    cli.output,
                    cli.query.as_deref(),
                )
                .await
            }
            None => Err(ComposeCtlError::InvalidInput {
                message: format!("unsupported command: {}", format_command(command)),
            }),
        },
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

async fn execute_api_command(
    cli: &Cli,
    conn_mgr: &ConnectionManager,
    overrides: &ConnectionOverrides,
    method: Method,
    path: &str,
    data: Option<&str>,
) -> Result<(), ComposeCtlError> {
    let client = conn_mgr.create_client(overrides)?;
    commands::api::handle_api_command(
        &client,
        commands::api::ApiCommandParams {
            method,
            path,
            data,
            query: cli.query.as_deref(),
            output_format: cli.output,
        },
    )
    .await
}

fn generate_completions(shell: cli::Shell) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Format command for human-readable logging (without sensitive data)
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Profile(cmd) => {
            use cli::ProfileCommands::*;
            match cmd {
                List => "profile list".to_string(),
                Path => "profile path".to_string(),
                Show { name } => format!("profile show {}", name),
                Set { name, .. } => format!("profile set {} [credentials redacted]", name),
                Remove { name, .. } => format!("profile remove {}", name),
                Default { name } => format!("profile default {}", name),
            }
        }
        Commands::Api { method, path, .. } => format!("api {} {}", method, path),
        other => match other.operation() {
            Some(op) => {
                let request = op.request();
                format!("{} ({} {})", op.command_name(), request.method, request.path)
            }
            None => "unknown".to_string(),
        },
    }
}
