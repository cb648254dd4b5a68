//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};

/// Run the init command
///
/// With `--api-url` the prompt is skipped, which keeps `init` usable from
/// scripts. Existing endpoint and policy settings are preserved, and a
/// config file that exists but cannot be read is left untouched.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to pgctl!".bold().green());
    println!("Let's point pgctl at your property management API.\n");

    let mut config = match Config::load_at(opts.config_ref()) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::NotFound)) => Config::default(),
        Err(err) => return Err(err),
    };

    let api_url = match opts.api_url_ref() {
        Some(url) => url.to_string(),
        None => {
            let theme = ColorfulTheme::default();
            let mut prompt = Input::<String>::with_theme(&theme).with_prompt("API base URL");
            if let Some(ref current) = config.api_url {
                prompt = prompt.default(current.clone());
            }
            prompt.interact_text()?
        }
    };

    // Validates the scheme and normalizes the trailing slash
    config.api_url = Some(config.api_url(Some(&api_url))?);
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );
    if let Some(ref url) = config.api_url {
        println!("  API URL: {}", url.bold());
    }

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Sign in", "pgctl login".cyan());
    println!("  {} - List your properties", "pgctl property list".cyan());

    Ok(())
}
