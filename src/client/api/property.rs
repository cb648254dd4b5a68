//! Property API trait

use async_trait::async_trait;

use crate::client::models::PropertySummary;
use crate::error::Result;

/// Property listing operations
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// List the properties the signed-in user can manage, in server order
    async fn list_properties(&self) -> Result<Vec<PropertySummary>>;
}
