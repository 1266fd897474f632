//! CLI structure and command definitions
//!
//! Every catalog command is a top-level subcommand taking positional
//! arguments. `api`, `profile`, `completions` and `version` sit alongside.

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use composectl_core::{Method, Operation};

pub mod profile;

pub use profile::ProfileCommands;

/// Manage Compose accounts, users, teams and deployment roles
#[derive(Parser, Debug)]
#[command(name = "composectl")]
#[command(version, about = "Manage Compose accounts, users, teams and deployment roles")]
#[command(long_about = "
Manage Compose accounts, users, teams and deployment roles

Each command sends a single request to the Compose API and prints a short
summary of the response.

EXAMPLES:
    # Store a token in a profile
    composectl profile set work --api-token <TOKEN>

    # Or use the environment
    export COMPOSEAPITOKEN=<TOKEN>

    # List teams
    composectl teams

    # Create a user without a phone number
    composectl add-user <ACCOUNT_ID> 'Ada Lovelace' ada@example.com

    # Give a team a role on a deployment
    composectl assign-team-role <DEPLOYMENT_ID> <TEAM_ID> developer

    # Raw JSON, filtered with JMESPath
    composectl teams -o json -q '_embedded.teams[].name'

For more help on a specific command, run:
    composectl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "COMPOSECTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "COMPOSECTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// API base URL (overrides the profile)
    #[arg(long, global = true, env = "COMPOSE_API_URL")]
    pub api_url: Option<String>,

    /// API bearer token (overrides the profile)
    #[arg(long, global = true, env = "COMPOSEAPITOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse the process arguments, exiting on usage errors
    pub fn parse_args() -> Self {
        Self::try_parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`.
    ///
    /// `profile set` shares `--api-token` and `--api-url` with the global
    /// connection flags, so clap hands it their environment fallbacks too.
    /// Those are connection overrides, not profile input, and are dropped.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut command = Self::command();
        let matches = command.try_get_matches_from_mut(args)?;
        let mut cli = Self::from_arg_matches(&matches).map_err(|e| e.format(&mut command))?;
        cli.drop_env_profile_values(&matches);
        Ok(cli)
    }

    fn drop_env_profile_values(&mut self, matches: &ArgMatches) {
        let Commands::Profile(ProfileCommands::Set {
            api_token, api_url, ..
        }) = &mut self.command
        else {
            return;
        };
        let Some(("profile", profile)) = matches.subcommand() else {
            return;
        };
        let Some(("set", set)) = profile.subcommand() else {
            return;
        };

        if set.value_source("api_token") == Some(ValueSource::EnvVariable) {
            *api_token = None;
        }
        if set.value_source("api_url") == Some(ValueSource::EnvVariable) {
            *api_url = None;
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Summary lines for API commands, plain text elsewhere
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List accounts
    Accounts,

    /// List the users of an account
    Users {
        /// Account ID
        account_id: String,
    },

    /// Add a user to an account
    #[command(name = "add-user")]
    AddUser {
        /// Account ID
        account_id: String,
        /// Full name
        name: String,
        /// Email address
        email: String,
        /// Phone number
        phone: Option<String>,
    },

    /// Remove a user from an account
    #[command(name = "remove-user")]
    RemoveUser {
        /// Account ID
        account_id: String,
        /// User ID
        user_id: String,
    },

    /// List teams
    Teams,

    /// Create a team
    #[command(name = "add-team")]
    AddTeam {
        /// Team name
        name: String,
    },

    /// Rename a team
    #[command(name = "update-team")]
    UpdateTeam {
        /// Team ID
        team_id: String,
        /// New team name
        name: String,
    },

    /// Delete a team
    #[command(name = "remove-team")]
    RemoveTeam {
        /// Team ID
        team_id: String,
    },

    /// Add users to a team
    #[command(name = "add-team-users")]
    AddTeamUsers {
        /// Team ID
        team_id: String,
        /// One or more user IDs
        #[arg(required = true, num_args = 1..)]
        user_ids: Vec<String>,
    },

    /// List deployments
    Deployments,

    /// List user roles on a deployment
    #[command(name = "user-roles")]
    UserRoles {
        /// Deployment ID
        deployment_id: String,
    },

    /// Give a user a role on a deployment
    #[command(name = "assign-user-role")]
    AssignUserRole {
        /// Deployment ID
        deployment_id: String,
        /// User ID
        user_id: String,
        /// Role name
        role: String,
    },

    /// Take a role on a deployment away from a user
    #[command(name = "remove-user-role")]
    RemoveUserRole {
        /// Deployment ID
        deployment_id: String,
        /// User ID
        user_id: String,
        /// Role name
        role: String,
    },

    /// List team roles on a deployment
    #[command(name = "team-roles")]
    TeamRoles {
        /// Deployment ID
        deployment_id: String,
    },

    /// Give a team a role on a deployment
    #[command(name = "assign-team-role")]
    AssignTeamRole {
        /// Deployment ID
        deployment_id: String,
        /// Team ID
        team_id: String,
        /// Role name
        role: String,
    },

    /// Take a role on a deployment away from a team
    #[command(name = "remove-team-role")]
    RemoveTeamRole {
        /// Deployment ID
        deployment_id: String,
        /// Team ID
        team_id: String,
        /// Role name
        role: String,
    },

    /// Raw API access - direct REST endpoint calls
    #[command(after_help = "EXAMPLES:
    # GET request
    composectl api get /deployments

    # POST request with JSON data
    composectl api post /teams --data '{\"team\":{\"name\":\"ops\"}}'

    # POST request from file
    composectl api post /teams --data @team.json
")]
    Api {
        /// HTTP method (get, post, put, patch, delete)
        method: Method,

        /// API path relative to the base URL (e.g. /teams)
        path: String,

        /// Request body as JSON, or @file to read it from a file
        #[arg(long)]
        data: Option<String>,
    },

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    Profile(ProfileCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// The catalog operation behind this command, if it is one
    pub fn operation(&self) -> Option<Operation> {
        let op = match self {
            Commands::Accounts => Operation::ListAccounts,
            Commands::Users { account_id } => Operation::ListUsers {
                account_id: account_id.clone(),
            },
            Commands::AddUser {
                account_id,
                name,
                email,
                phone,
            } => Operation::CreateUser {
                account_id: account_id.clone(),
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
            },
            Commands::RemoveUser {
                account_id,
                user_id,
            } => Operation::DeleteUser {
                account_id: account_id.clone(),
                user_id: user_id.clone(),
            },
            Commands::Teams => Operation::ListTeams,
            Commands::AddTeam { name } => Operation::CreateTeam { name: name.clone() },
            Commands::UpdateTeam { team_id, name } => Operation::RenameTeam {
                team_id: team_id.clone(),
                name: name.clone(),
            },
            Commands::RemoveTeam { team_id } => Operation::DeleteTeam {
                team_id: team_id.clone(),
            },
            Commands::AddTeamUsers { team_id, user_ids } => Operation::AddTeamUsers {
                team_id: team_id.clone(),
                user_ids: user_ids.clone(),
            },
            Commands::Deployments => Operation::ListDeployments,
            Commands::UserRoles { deployment_id } => Operation::ListUserRoles {
                deployment_id: deployment_id.clone(),
            },
            Commands::AssignUserRole {
                deployment_id,
                user_id,
                role,
            } => Operation::AssignUserRole {
                deployment_id: deployment_id.clone(),
                user_id: user_id.clone(),
                role: role.clone(),
            },
            Commands::RemoveUserRole {
                deployment_id,
                user_id,
                role,
            } => Operation::RemoveUserRole {
                deployment_id: deployment_id.clone(),
                user_id: user_id.clone(),
                role: role.clone(),
            },
            Commands::TeamRoles { deployment_id } => Operation::ListTeamRoles {
                deployment_id: deployment_id.clone(),
            },
            Commands::AssignTeamRole {
                deployment_id,
                team_id,
                role,
            } => Operation::AssignTeamRole {
                deployment_id: deployment_id.clone(),
                team_id: team_id.clone(),
                role: role.clone(),
            },
            Commands::RemoveTeamRole {
                deployment_id,
                team_id,
                role,
            } => Operation::RemoveTeamRole {
                deployment_id: deployment_id.clone(),
                team_id: team_id.clone(),
                role: role.clone(),
            },
            Commands::Api { .. }
            | Commands::Profile(_)
            | Commands::Version
            | Commands::Completions { .. } => return None,
        };
        Some(op)
    }
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}
