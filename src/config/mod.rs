//! Configuration management for pgctl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Placeholder substituted with the active property id in request paths
pub const DEFAULT_PLACEHOLDER: &str = ":pgId";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the platform API (e.g. https://api.example.com/api)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Backend endpoint paths
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Token in request paths replaced with the active property id
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// What `property use` does with an id that is not in the known list
    #[serde(default)]
    pub unknown_property: UnknownPropertyPolicy,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

/// Session and property endpoint paths, relative to `api_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub current_user: String,
    pub login: String,
    pub refresh: String,
    pub logout: String,
    pub properties: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            current_user: "/auth/me".to_string(),
            login: "/auth/login".to_string(),
            refresh: "/auth/refresh".to_string(),
            logout: "/auth/logout".to_string(),
            properties: "/pg".to_string(),
        }
    }
}

/// Handling of a switch to a property id missing from the known list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownPropertyPolicy {
    /// Leave the current selection as it is
    #[default]
    Ignore,
    /// Report an error to the caller
    Reject,
    /// Select the first known property
    FallbackFirst,
}

/// User preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".pgctl").join("config.yaml"))
    }

    /// Resolve the config path, preferring an explicit override
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an explicit path or the default location
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to an explicit path or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Resolve the API base URL, preferring a runtime override.
    ///
    /// Trailing slashes are stripped so endpoint paths can be appended as-is.
    pub fn api_url(&self, override_url: Option<&str>) -> Result<String> {
        let url = override_url
            .or(self.api_url.as_deref())
            .ok_or_else(|| {
                ConfigError::Invalid(
                    "API URL not configured. Run `pgctl init` or pass --api-url.".to_string(),
                )
            })?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(
                ConfigError::Invalid(format!("API URL must start with http(s)://: {url}")).into(),
            );
        }

        Ok(url.trim_end_matches('/').to_string())
    }
}
