//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are resolved in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (table, json); falls back to the config preference
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.pgctl/config.yaml)
    pub config: Option<String>,

    /// API base URL override
    pub api_url: Option<String>,

    /// One-shot property override; never persisted
    pub property: Option<String>,

    /// Directory holding persisted session state
    pub state_dir: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            property: cli.property.clone(),
            state_dir: cli.state_dir.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get API URL override as `Option<&str>`.
    pub fn api_url_ref(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Get property override as `Option<&str>`.
    pub fn property_ref(&self) -> Option<&str> {
        self.property.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: Some(OutputFormat::Json),
            config: Some("/custom/path".to_string()),
            api_url: Some("http://localhost:5000/api".to_string()),
            property: Some("pg-1".to_string()),
            state_dir: None,
        };

        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(opts.api_url_ref(), Some("http://localhost:5000/api"));
        assert_eq!(opts.property_ref(), Some("pg-1"));
    }

    #[test]
    fn test_global_options_defaults() {
        let opts = GlobalOptions::default();

        assert_eq!(opts.format, None);
        assert_eq!(opts.config_ref(), None);
        assert_eq!(opts.property_ref(), None);
    }
}
