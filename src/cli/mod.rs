//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod auth;
pub mod context;
pub mod init;
pub mod property;
pub mod request;
pub mod status;

pub use args::OutputFormat;

/// pgctl - command-line companion for the PG / hostel management platform
#[derive(Parser, Debug)]
#[command(name = "pgctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json) [default: table]
    #[arg(long, global = true, env = "PGCTL_FORMAT", hide_env = true)]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "PGCTL_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true, env = "PGCTL_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Run against this property without changing the saved selection
    #[arg(long, global = true, env = "PGCTL_PROPERTY", hide_env = true)]
    pub property: Option<String>,

    /// Directory for persisted session state
    #[arg(long, global = true, env = "PGCTL_STATE_DIR", hide = true)]
    pub state_dir: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "PGCTL_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize pgctl configuration
    Init,

    /// Sign in with email and password
    Login {
        /// Account email (prompted if omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show configuration and saved session status
    Status,

    /// Manage the active property
    #[command(subcommand, visible_alias = "pg")]
    Property(PropertyCommands),

    /// Send a request to the platform API
    #[command(after_help = "EXAMPLES:\n  \
            pgctl request GET /pg/:pgId/rooms\n  \
            pgctl request GET /pg/:pgId/tenants --query status=active\n  \
            pgctl request POST /pg/:pgId/complaints --data '{\"title\":\"Leaking tap\"}'\n  \
            pgctl request POST /pg/:pgId/expenses --data @expense.json\n  \
            pgctl request POST /pg/:pgId/expenses/import --data @march.csv --content-type text/csv\n\n\
            `:pgId` is replaced with the active property id.")]
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Path relative to the API URL; may contain :pgId
        path: String,

        /// JSON body, or @FILE to read it from a file
        #[arg(long, short = 'd')]
        data: Option<String>,

        /// Send --data verbatim with this content type instead of as JSON
        #[arg(long, requires = "data")]
        content_type: Option<String>,

        /// Query parameters as key=value, repeatable
        #[arg(long, short = 'q', value_parser = request::parse_query_pair)]
        query: Vec<(String, String)>,
    },

    /// Generate shell completions
    #[command(after_help = "\
  bash:   pgctl completion bash > /etc/bash_completion.d/pgctl
  zsh:    pgctl completion zsh > \"${fpath[1]}/_pgctl\"
  fish:   pgctl completion fish > ~/.config/fish/completions/pgctl.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Property management subcommands
#[derive(Subcommand, Debug)]
pub enum PropertyCommands {
    /// List the properties you manage
    #[command(visible_alias = "ls")]
    List,

    /// Select the active property
    Use {
        /// Property ID to make active
        id: String,
    },

    /// Show the active property
    Current,

    /// Re-fetch properties and re-check the saved selection
    Refresh,
}
