//! Login, logout and whoami command implementations

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::client::Credentials;
use crate::error::Result;
use crate::models::user_details;
use crate::output::{json, table};

/// Run the login command
pub async fn login(opts: &GlobalOptions, email: Option<String>) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;

    let email = match email {
        Some(email) => email,
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    println!("\n{}", "Signing in...".cyan());
    let user = ctx.session.login(&Credentials { email, password }).await?;
    println!("{} Signed in as {}", "✓".green(), user.name.bold());

    ctx.load_properties().await?;
    ctx.persist_session()?;

    match ctx.properties.active() {
        Some(active) => println!(
            "  Active property: {} ({})",
            active.name.bold(),
            active.id
        ),
        None => println!("{}", "⚠ No properties found for this account.".yellow()),
    }

    Ok(())
}

/// Run the logout command
pub async fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    ctx.session.logout().await;
    ctx.persist_session()?;

    println!("{} Signed out", "✓".green());
    Ok(())
}

/// Run the whoami command
pub async fn whoami(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    ctx.session.initialize().await;
    ctx.persist_session()?;
    let user = ctx.session.require_user()?;

    match ctx.format {
        OutputFormat::Table => println!("{}", table::format_details(&user_details(&user))),
        OutputFormat::Json => println!("{}", json::format_json(&user, None)?),
    }

    Ok(())
}
