//! Property command implementations

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::{Error, Result};
use crate::models::PropertyDisplay;
use crate::output::{Formattable, json};

/// Run the property list command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    ctx.load_properties().await?;
    ctx.persist_session()?;

    let rows = PropertyDisplay::list(ctx.properties.properties(), ctx.properties.active_id());
    rows.print(ctx.format, ctx.properties.active_id())?;

    Ok(())
}

/// Run the property use command
pub async fn use_property(opts: &GlobalOptions, id: String) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    if ctx.has_property_override() {
        return Err(Error::Other(
            "`property use` saves a selection and cannot be combined with --property".to_string(),
        ));
    }

    ctx.load_properties().await?;
    ctx.persist_session()?;

    let before = ctx.properties.active_id().map(str::to_string);
    ctx.properties.switch_property(&id)?;

    match ctx.properties.active() {
        Some(active) if active.id == id => println!(
            "{} Active property set to: {} ({})",
            "✓".green(),
            active.name.bold(),
            active.id
        ),
        Some(active) if before.as_deref() != Some(active.id.as_str()) => println!(
            "{} Property '{}' not found, switched to: {} ({})",
            "⚠".yellow(),
            id,
            active.name.bold(),
            active.id
        ),
        _ => {
            println!(
                "{} Property '{}' not found, selection unchanged",
                "⚠".yellow(),
                id
            );
            println!("  → Run 'pgctl property list' to see your properties");
        }
    }

    Ok(())
}

/// Run the property current command
pub async fn current(opts: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    ctx.load_properties().await?;
    ctx.persist_session()?;

    let active = ctx.properties.require_active()?;
    match ctx.format {
        OutputFormat::Table => println!("{} ({})", active.name.bold(), active.id),
        OutputFormat::Json => println!("{}", json::format_json(active, Some(active.id.as_str()))?),
    }

    Ok(())
}

/// Run the property refresh command
pub async fn refresh(opts: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::new(opts)?;
    ctx.load_properties().await?;
    ctx.persist_session()?;

    let count = ctx.properties.properties().len();
    println!("{} Found {} properties", "✓".green(), count);
    match ctx.properties.active() {
        Some(active) => println!("  Active property: {} ({})", active.name.bold(), active.id),
        None => println!("{}", "⚠ No property selected.".yellow()),
    }

    Ok(())
}
