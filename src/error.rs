//! Error types for the pgctl CLI

use thiserror::Error;

/// Result type alias for pgctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors
///
/// Non-401 failures keep the status and body the server sent so callers
/// can report them untouched.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session expired or not logged in. Run `pgctl login` to sign in.")]
    Unauthorized { body: String },

    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `pgctl init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Durable client-state storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not determine a data directory for persisted state")]
    NoDataDir,

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Saved session cookies are unreadable: {0}")]
    Cookies(String),
}

/// Session and property context errors
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Property '{0}' is not one of your properties. Run `pgctl property list` to see them.")]
    UnknownProperty(String),

    #[error("No property selected. Run `pgctl property use <ID>` to pick one.")]
    NoActiveProperty,

    #[error("Not logged in. Run `pgctl login` to sign in.")]
    NotAuthenticated,

    #[error("Could not fetch your properties to check '{0}'. Try again once the API is reachable.")]
    PropertiesUnavailable(String),
}
