//! Property (PG) models

use serde::{Deserialize, Serialize};

/// Lightweight reference to a manageable property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySummary {
    /// Property ID
    #[serde(alias = "_id", deserialize_with = "super::string_or_number")]
    pub id: String,

    /// Property name
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
impl PropertySummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
