//! Request and response types for the platform client

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// Outgoing request body
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized as JSON with a JSON content type
    Json(serde_json::Value),
    /// Pre-encoded bytes, e.g. a multipart payload built by the caller
    Raw {
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// A request to the platform API.
///
/// `path` is relative to the API base URL and may contain the property
/// placeholder.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub(crate) retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(value));
        self
    }

    pub fn raw(mut self, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = Some(RequestBody::Raw {
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Whether this request is already the resubmission after a refresh
    pub fn is_retry(&self) -> bool {
        self.retried
    }
}

/// A response as received, body fully read
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response: {}. Body was: {}",
                e,
                self.text()
            ))
            .into()
        })
    }

    /// Body as (lossy) UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Turn a non-2xx response into an error carrying status and body
    pub(crate) fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status.as_u16(),
                body: self.text(),
            }
            .into())
        }
    }
}
