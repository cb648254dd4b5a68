//! Status command implementation

use std::sync::Arc;

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::open_state_store;
use crate::config::{Config, UnknownPropertyPolicy};
use crate::error::Result;
use crate::storage::{KeyValueStore, SELECTED_PROPERTY_KEY, SESSION_COOKIES_KEY, ScopedStore};

/// Run the status command to display configuration and saved state.
///
/// Works offline: nothing here talks to the API.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "pgctl Status".bold());

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "pgctl init".cyan()
            );
            println!();
            return Ok(());
        }
    };

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!("Config file: {}", config_path.display().to_string().cyan());
    println!();

    let api_url = match config.api_url(opts.api_url_ref()) {
        Ok(url) => {
            println!("{} API URL: {}", "✓".green(), url.cyan());
            url
        }
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            println!();
            return Ok(());
        }
    };

    if config.placeholder != crate::config::DEFAULT_PLACEHOLDER {
        println!("{} Path placeholder: {}", "○".dimmed(), config.placeholder);
    }
    if config.unknown_property != UnknownPropertyPolicy::Ignore {
        println!(
            "{} Unknown property policy: {:?}",
            "○".dimmed(),
            config.unknown_property
        );
    }

    let backing = match open_state_store(opts.state_dir.as_deref()) {
        Ok(store) => store,
        Err(err) => {
            println!("{} Session state unavailable: {}", "⚠".yellow(), err);
            println!();
            return Ok(());
        }
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(ScopedStore::for_api_url(backing, &api_url));

    // Read failures count as "nothing saved"
    if store.get(SESSION_COOKIES_KEY).ok().flatten().is_some() {
        println!(
            "{} Session saved (validated on next command)",
            "✓".green()
        );
    } else {
        println!("{} Not signed in", "○".dimmed());
        println!("  → Run 'pgctl login' to sign in");
    }

    match store.get(SELECTED_PROPERTY_KEY).ok().flatten() {
        Some(id) => println!("{} Selected property: {}", "✓".green(), id),
        None => {
            println!("{} No property selected", "○".dimmed());
            println!("  → Run 'pgctl property use <ID>' to pick one");
        }
    }

    if let Some(ref id) = opts.property {
        println!(
            "{} Property override: {} {}",
            "○".dimmed(),
            id.bold(),
            "(via --property flag)".dimmed()
        );
    }

    println!();
    Ok(())
}
