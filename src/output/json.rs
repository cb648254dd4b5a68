//! JSON output formatting

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T> {
    /// The actual data
    pub data: T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize, Deserialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Property the command ran against, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl<T> JsonOutput<T> {
    /// Create a new JSON output with metadata
    pub fn new(data: T, property: Option<&str>) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                property: property.map(str::to_string),
            },
        }
    }
}

/// Format data as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(
    data: &T,
    property: Option<&str>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data, property))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Room {
        number: String,
        beds: u8,
    }

    #[test]
    fn test_format_json_wraps_data_with_meta() {
        let rooms = vec![Room {
            number: "101".to_string(),
            beds: 3,
        }];

        let result = format_json(&rooms, Some("pg-1")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(value["data"][0]["number"], "101");
        assert_eq!(value["data"][0]["beds"], 3);
        assert_eq!(value["meta"]["property"], "pg-1");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(value["meta"]["timestamp"].is_string());
    }

    #[test]
    fn test_format_json_omits_missing_property() {
        let result = format_json(&Vec::<Room>::new(), None).unwrap();

        assert!(result.contains("\"data\": []"));
        assert!(!result.contains("\"property\""));
    }
}
