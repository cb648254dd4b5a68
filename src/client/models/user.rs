//! Session user models

use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User ID
    #[serde(alias = "_id", deserialize_with = "super::string_or_number")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Phone number (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Role, e.g. "owner" or "manager" (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Whether the account is active (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    /// Fields not modeled above, kept as sent
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
