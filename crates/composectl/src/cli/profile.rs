use clap::Subcommand;

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add")]
    #[command(after_help = "EXAMPLES:
    # Create a profile with a token
    composectl profile set work --api-token <TOKEN>

    # Token prompted interactively
    composectl profile set work

    # Point a profile at another endpoint
    composectl profile set local --api-url http://localhost:8080/2016-07 --api-token dev

    # Keep the token in the OS keyring
    composectl profile set work --use-keyring
")]
    Set {
        /// Profile name
        name: String,

        /// API token (prompted when omitted)
        #[arg(long)]
        api_token: Option<String>,

        /// API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Store the token in the OS keyring instead of the config file
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name to remove
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Set the default profile
    #[command(name = "default")]
    Default {
        /// Profile name
        name: String,
    },
}
