//! pgctl - command-line companion for the PG / hostel management platform

use clap::{CommandFactory, Parser};

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod property;
mod session;
mod storage;

use cli::args::GlobalOptions;
use cli::{Cli, Commands, PropertyCommands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` applies unless `--debug` is given
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Login { email } => cli::auth::login(&opts, email).await,
        Commands::Logout => cli::auth::logout(&opts).await,
        Commands::Whoami => cli::auth::whoami(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Property(cmd) => match cmd {
            PropertyCommands::List => cli::property::list(&opts).await,
            PropertyCommands::Use { id } => cli::property::use_property(&opts, id).await,
            PropertyCommands::Current => cli::property::current(&opts).await,
            PropertyCommands::Refresh => cli::property::refresh(&opts).await,
        },
        Commands::Request {
            method,
            path,
            data,
            content_type,
            query,
        } => {
            cli::request::run(
                &opts,
                &method,
                &path,
                data.as_deref(),
                content_type.as_deref(),
                &query,
            )
            .await
        }
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pgctl", &mut std::io::stdout());
            Ok(())
        }
    }
}
