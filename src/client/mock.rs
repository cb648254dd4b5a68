//! Mock platform API client for testing
//!
//! Provides a mock implementation of the API traits for unit testing
//! the session and property contexts without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{PropertyApi, SessionApi};
use super::models::{Credentials, PropertySummary, UserInfo};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockPgClient::new()
///     .with_properties(vec![PropertySummary::new("a", "Alpha PG")])
///     .await;
///
/// let properties = mock.list_properties().await?;
/// assert_eq!(properties.len(), 1);
/// ```
#[derive(Default)]
pub struct MockPgClient {
    /// Properties to return from list_properties
    properties: Arc<Mutex<Vec<PropertySummary>>>,
    /// User to return from current_user and login (None answers 401)
    user: Arc<Mutex<Option<UserInfo>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub current_user: usize,
    pub login: usize,
    pub logout: usize,
    pub list_properties: usize,
}

impl MockPgClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure properties to return from list_properties.
    pub async fn with_properties(self, properties: Vec<PropertySummary>) -> Self {
        *self.properties.lock().await = properties;
        self
    }

    /// Configure the signed-in user.
    pub async fn with_user(self, user: UserInfo) -> Self {
        *self.user.lock().await = Some(user);
        self
    }

    /// Configure an error returned by the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Replace the properties after construction.
    pub async fn set_properties(&self, properties: Vec<PropertySummary>) {
        *self.properties.lock().await = properties;
    }

    /// Queue an error for the next call after construction.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Get call counts for verification.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    async fn take_error(&self) -> Result<()> {
        match self.error.lock().await.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    async fn signed_in_user(&self) -> Result<UserInfo> {
        self.user.lock().await.clone().ok_or_else(|| {
            ApiError::Unauthorized {
                body: String::new(),
            }
            .into()
        })
    }
}

/// Build a user fixture.
pub fn user_fixture(id: &str, name: &str) -> UserInfo {
    UserInfo {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        role: Some("owner".to_string()),
        is_active: Some(true),
        extra: serde_json::Map::new(),
    }
}

#[async_trait]
impl SessionApi for MockPgClient {
    async fn current_user(&self) -> Result<UserInfo> {
        self.call_count.lock().await.current_user += 1;
        self.take_error().await?;
        self.signed_in_user().await
    }

    async fn login(&self, _credentials: &Credentials) -> Result<UserInfo> {
        self.call_count.lock().await.login += 1;
        self.take_error().await?;
        self.signed_in_user().await
    }

    async fn logout(&self) -> Result<()> {
        self.call_count.lock().await.logout += 1;
        self.take_error().await
    }
}

#[async_trait]
impl PropertyApi for MockPgClient {
    async fn list_properties(&self) -> Result<Vec<PropertySummary>> {
        self.call_count.lock().await.list_properties += 1;
        self.take_error().await?;
        Ok(self.properties.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_error_is_consumed_once() {
        let mock = MockPgClient::new()
            .with_properties(vec![PropertySummary::new("a", "Alpha PG")])
            .await
            .with_error(ApiError::Network("offline".to_string()))
            .await;

        assert!(mock.list_properties().await.is_err());
        assert_eq!(mock.list_properties().await.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.list_properties, 2);
    }

    #[tokio::test]
    async fn test_mock_without_user_is_unauthorized() {
        let mock = MockPgClient::new();
        assert!(mock.current_user().await.is_err());

        let mock = mock.with_user(user_fixture("u-1", "Ravi")).await;
        assert_eq!(mock.current_user().await.unwrap().id, "u-1");
    }
}
