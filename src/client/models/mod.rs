//! Platform API data models
//!
//! Only the session and property shapes are typed; every other resource
//! (rooms, floors, tenants, complaints, expenses) passes through as raw
//! JSON.

mod auth;
mod property;
mod user;

use serde::{Deserialize, Deserializer};

pub use auth::Credentials;
pub use property::PropertySummary;
pub use user::UserInfo;

/// Response body that may or may not be wrapped by the backend.
///
/// The platform answers some endpoints with `{ "data": ... }`, the session
/// endpoints with `{ "user": ... }`, and others with the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Data { data: T },
    User { user: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Data { data } => data,
            Envelope::User { user } => user,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Accept ids sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
