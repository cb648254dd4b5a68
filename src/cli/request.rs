//! Raw API request command
//!
//! Sends an arbitrary request through the platform client, so `:pgId`
//! substitution and the refresh-and-retry policy apply just as they do for
//! the built-in commands.

use std::path::Path;

use colored::Colorize;
use reqwest::Method;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::client::ApiRequest;
use crate::error::{Error, Result};
use crate::output::json;

/// Parse a `key=value` query argument
pub fn parse_query_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Parse an HTTP method name, case-insensitively
pub fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.to_uppercase().as_bytes())
        .map_err(|_| Error::Other(format!("Invalid HTTP method: {raw}")))
}

/// Read a `--data` argument: inline text, or `@path` to read a file
fn read_data(raw: &str) -> Result<Vec<u8>> {
    match raw.strip_prefix('@') {
        Some(path) => Ok(std::fs::read(Path::new(path))?),
        None => Ok(raw.as_bytes().to_vec()),
    }
}

/// Attach `--data` to the request.
///
/// Without a content type the data must be JSON; with one it is sent as-is.
pub fn with_body(
    request: ApiRequest,
    raw: &str,
    content_type: Option<&str>,
) -> Result<ApiRequest> {
    let bytes = read_data(raw)?;
    match content_type {
        Some(content_type) => Ok(request.raw(content_type, bytes)),
        None => Ok(request.json(serde_json::from_slice(&bytes)?)),
    }
}

/// Run the request command
pub async fn run(
    opts: &GlobalOptions,
    method: &str,
    path: &str,
    data: Option<&str>,
    content_type: Option<&str>,
    query: &[(String, String)],
) -> Result<()> {
    let mut request = ApiRequest::new(parse_method(method)?, path);
    for (key, value) in query {
        request = request.query(key, value);
    }
    if let Some(data) = data {
        request = with_body(request, data, content_type)?;
    }

    let mut ctx = CommandContext::new(opts)?;
    if path.contains(ctx.config.placeholder.as_str()) {
        ctx.load_properties().await?;
        ctx.properties.require_active()?;
    }

    let result = ctx.client.send(request).await;
    ctx.persist_session()?;
    let response = result?;

    let property = ctx.client.active_property_id();
    match response.json::<serde_json::Value>() {
        Ok(value) => match ctx.format {
            OutputFormat::Table => println!("{}", serde_json::to_string_pretty(&value)?),
            OutputFormat::Json => {
                println!("{}", json::format_json(&value, property.as_deref())?)
            }
        },
        Err(_) if response.body.is_empty() => {
            println!("{} {}", "✓".green(), response.status);
        }
        Err(_) => println!("{}", response.text()),
    }

    Ok(())
}
