//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

use serde::Serialize;
use tabled::Tabled;

use crate::client::{PropertySummary, UserInfo};

/// Property display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PropertyDisplay {
    /// Marker for the active property
    #[tabled(rename = "")]
    #[serde(rename = "active")]
    pub marker: String,

    /// Property ID
    #[tabled(rename = "PG ID")]
    pub id: String,

    /// Property name
    #[tabled(rename = "NAME")]
    pub name: String,
}

impl PropertyDisplay {
    /// Build display rows, marking `active_id` with `*`
    pub fn list(properties: &[PropertySummary], active_id: Option<&str>) -> Vec<Self> {
        properties
            .iter()
            .map(|p| Self {
                marker: if Some(p.id.as_str()) == active_id {
                    "*".to_string()
                } else {
                    String::new()
                },
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }
}

/// Rows shown by `whoami` in table mode
pub fn user_details(user: &UserInfo) -> Vec<(&'static str, String)> {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    vec![
        ("ID", user.id.clone()),
        ("Name", user.name.clone()),
        ("Email", user.email.clone()),
        ("Phone", or_dash(&user.phone)),
        ("Role", or_dash(&user.role)),
        (
            "Active",
            match user.is_active {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => "-".to_string(),
            },
        ),
    ]
}
