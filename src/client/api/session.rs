//! Session API trait

use async_trait::async_trait;

use crate::client::models::{Credentials, UserInfo};
use crate::error::Result;

/// Session operations against the platform API
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Fetch the user bound to the current session
    async fn current_user(&self) -> Result<UserInfo>;

    /// Exchange credentials for a session and return the signed-in user
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo>;

    /// Terminate the session server-side
    async fn logout(&self) -> Result<()>;
}
