//! Active-property context
//!
//! Holds the properties the session may act on and the one currently
//! selected. The selection is persisted so it survives restarts, and it is
//! pushed into the [`PropertyScope`] the HTTP client reads when it resolves
//! `:pgId` paths. After every operation the scope and the selection agree.

use std::sync::Arc;

use log::{debug, warn};

use crate::client::{PropertyApi, PropertyScope, PropertySummary};
use crate::config::UnknownPropertyPolicy;
use crate::error::{ContextError, Result};
use crate::storage::{KeyValueStore, SELECTED_PROPERTY_KEY};

/// Known properties and the active selection
pub struct PropertyContext {
    api: Arc<dyn PropertyApi>,
    store: Arc<dyn KeyValueStore>,
    scope: PropertyScope,
    policy: UnknownPropertyPolicy,
    properties: Vec<PropertySummary>,
    active: Option<PropertySummary>,
}

impl PropertyContext {
    pub fn new(
        api: Arc<dyn PropertyApi>,
        store: Arc<dyn KeyValueStore>,
        scope: PropertyScope,
        policy: UnknownPropertyPolicy,
    ) -> Self {
        Self {
            api,
            store,
            scope,
            policy,
            properties: Vec::new(),
            active: None,
        }
    }

    /// All known properties, in server order
    pub fn properties(&self) -> &[PropertySummary] {
        &self.properties
    }

    /// The selected property
    pub fn active(&self) -> Option<&PropertySummary> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.id.as_str())
    }

    /// The selected property, or an error asking the operator to pick one
    pub fn require_active(&self) -> Result<&PropertySummary> {
        self.active
            .as_ref()
            .ok_or_else(|| ContextError::NoActiveProperty.into())
    }

    /// Replace the known properties and re-derive the selection.
    ///
    /// An empty list clears the selection. Otherwise the persisted id wins
    /// if it is still in the list, else the first entry is selected; the
    /// result is persisted.
    pub fn set_properties(&mut self, properties: Vec<PropertySummary>) {
        self.properties = properties;

        if self.properties.is_empty() {
            debug!("No properties available, clearing selection");
            self.apply(None);
            return;
        }

        let persisted = self.persisted_id();
        let selected = persisted
            .as_deref()
            .and_then(|id| self.find(id))
            .unwrap_or_else(|| self.properties[0].clone());

        if persisted.as_deref() != Some(selected.id.as_str()) {
            debug!(
                "Persisted property {:?} unavailable, selecting {}",
                persisted, selected.id
            );
        }

        self.persist(&selected.id);
        self.apply(Some(selected));
    }

    /// Re-fetch the property list from the server.
    ///
    /// A failed fetch is logged and leaves the current state as it was.
    /// Returns whether the list was actually fetched.
    pub async fn refresh(&mut self) -> bool {
        match self.api.list_properties().await {
            Ok(properties) => {
                debug!("Fetched {} properties", properties.len());
                self.set_properties(properties);
                true
            }
            Err(err) => {
                warn!("Failed to refresh properties: {}", err);
                false
            }
        }
    }

    /// Make `id` the active property.
    ///
    /// Ids missing from the known list are handled per the configured
    /// [`UnknownPropertyPolicy`].
    pub fn switch_property(&mut self, id: &str) -> Result<()> {
        let selected = match self.find(id) {
            Some(property) => property,
            None => match self.policy {
                UnknownPropertyPolicy::Ignore => {
                    debug!("Ignoring switch to unknown property {}", id);
                    return Ok(());
                }
                UnknownPropertyPolicy::Reject => {
                    return Err(ContextError::UnknownProperty(id.to_string()).into());
                }
                UnknownPropertyPolicy::FallbackFirst => match self.properties.first() {
                    Some(first) => {
                        debug!("Unknown property {}, falling back to {}", id, first.id);
                        first.clone()
                    }
                    None => return Ok(()),
                },
            },
        };

        self.persist(&selected.id);
        self.apply(Some(selected));
        Ok(())
    }

    fn find(&self, id: &str) -> Option<PropertySummary> {
        self.properties.iter().find(|p| p.id == id).cloned()
    }

    fn apply(&mut self, selected: Option<PropertySummary>) {
        self.scope.set(selected.as_ref().map(|p| p.id.as_str()));
        self.active = selected;
    }

    fn persisted_id(&self) -> Option<String> {
        match self.store.get(SELECTED_PROPERTY_KEY) {
            Ok(id) => id,
            Err(err) => {
                warn!("Could not read persisted property selection: {}", err);
                None
            }
        }
    }

    fn persist(&self, id: &str) {
        if let Err(err) = self.store.set(SELECTED_PROPERTY_KEY, id) {
            warn!("Could not persist property selection: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ApiRequest, MockPgClient, PgClient};
    use crate::error::{ApiError, Error};
    use crate::storage::MemoryStore;

    fn pg(id: &str) -> PropertySummary {
        PropertySummary::new(id, format!("{} PG", id))
    }

    fn context_with(
        mock: Arc<MockPgClient>,
        persisted: Option<&str>,
        policy: UnknownPropertyPolicy,
    ) -> (PropertyContext, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        if let Some(id) = persisted {
            store.set(SELECTED_PROPERTY_KEY, id).unwrap();
        }
        let ctx = PropertyContext::new(mock, store.clone(), PropertyScope::new(), policy);
        (ctx, store)
    }

    fn stored(store: &MemoryStore) -> Option<String> {
        store.get(SELECTED_PROPERTY_KEY).unwrap()
    }

    fn assert_in_sync(ctx: &PropertyContext) {
        assert_eq!(ctx.scope.get().as_deref(), ctx.active_id());
    }

    #[test]
    fn test_persisted_selection_is_restored() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            Some("B"),
            UnknownPropertyPolicy::Ignore,
        );

        ctx.set_properties(vec![pg("A"), pg("B")]);

        assert_eq!(ctx.active_id(), Some("B"));
        assert_eq!(stored(&store).as_deref(), Some("B"));
        assert_in_sync(&ctx);
    }

    #[test]
    fn test_missing_persisted_value_selects_first() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            None,
            UnknownPropertyPolicy::Ignore,
        );

        ctx.set_properties(vec![pg("A"), pg("B")]);

        assert_eq!(ctx.active_id(), Some("A"));
        assert_eq!(stored(&store).as_deref(), Some("A"));
        assert_in_sync(&ctx);
    }

    #[test]
    fn test_unknown_persisted_value_selects_first() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            Some("Z"),
            UnknownPropertyPolicy::Ignore,
        );

        ctx.set_properties(vec![pg("A"), pg("B")]);

        assert_eq!(ctx.active_id(), Some("A"));
        assert_eq!(stored(&store).as_deref(), Some("A"));
    }

    #[test]
    fn test_cold_start_with_stale_persisted_id() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            Some("B"),
            UnknownPropertyPolicy::Ignore,
        );

        ctx.set_properties(vec![pg("A"), pg("C")]);

        assert_eq!(ctx.active_id(), Some("A"));
        assert_eq!(ctx.scope.get().as_deref(), Some("A"));
        assert_eq!(stored(&store).as_deref(), Some("A"));
    }

    #[test]
    fn test_empty_list_clears_selection() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            Some("A"),
            UnknownPropertyPolicy::Ignore,
        );
        ctx.set_properties(vec![pg("A")]);

        ctx.set_properties(Vec::new());

        assert_eq!(ctx.active(), None);
        assert_eq!(ctx.scope.get(), None);
        assert!(ctx.require_active().is_err());
        // The persisted value is not erased
        assert_eq!(stored(&store).as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_empty_list_leaves_placeholder_unresolved() {
        let mut server = mockito::Server::new_async().await;
        let unresolved = server
            .mock("GET", "/pg/:pgId/floors")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let scope = PropertyScope::new();
        let client = Arc::new(PgClient::new(&server.url(), scope.clone()).unwrap());
        let mut ctx = PropertyContext::new(
            client.clone(),
            Arc::new(MemoryStore::new()),
            scope,
            UnknownPropertyPolicy::Ignore,
        );
        ctx.set_properties(vec![pg("A")]);
        ctx.set_properties(Vec::new());

        let err = client
            .send(ApiRequest::get("/pg/:pgId/floors"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(ApiError::Http { status: 404, .. })));
        unresolved.assert_async().await;
    }

    #[test]
    fn test_switch_to_known_property() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            None,
            UnknownPropertyPolicy::Ignore,
        );
        ctx.set_properties(vec![pg("A"), pg("B")]);

        ctx.switch_property("B").unwrap();

        assert_eq!(ctx.active_id(), Some("B"));
        assert_eq!(ctx.scope.get().as_deref(), Some("B"));
        assert_eq!(stored(&store).as_deref(), Some("B"));
    }

    #[test]
    fn test_switch_to_unknown_property_is_ignored() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            None,
            UnknownPropertyPolicy::Ignore,
        );
        ctx.set_properties(vec![pg("A"), pg("B")]);

        ctx.switch_property("Z").unwrap();

        assert_eq!(ctx.active_id(), Some("A"));
        assert_eq!(ctx.scope.get().as_deref(), Some("A"));
        assert_eq!(stored(&store).as_deref(), Some("A"));
    }

    #[test]
    fn test_switch_to_unknown_property_rejected() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            None,
            UnknownPropertyPolicy::Reject,
        );
        ctx.set_properties(vec![pg("A"), pg("B")]);
        ctx.switch_property("B").unwrap();

        let err = ctx.switch_property("Z").unwrap_err();

        assert!(err.to_string().contains("Z"));
        assert_eq!(ctx.active_id(), Some("B"));
        assert_eq!(stored(&store).as_deref(), Some("B"));
        assert_in_sync(&ctx);
    }

    #[test]
    fn test_switch_to_unknown_property_falls_back_to_first() {
        let (mut ctx, store) = context_with(
            Arc::new(MockPgClient::new()),
            None,
            UnknownPropertyPolicy::FallbackFirst,
        );
        ctx.set_properties(vec![pg("A"), pg("B")]);
        ctx.switch_property("B").unwrap();

        ctx.switch_property("Z").unwrap();

        assert_eq!(ctx.active_id(), Some("A"));
        assert_eq!(stored(&store).as_deref(), Some("A"));
        assert_in_sync(&ctx);
    }

    #[tokio::test]
    async fn test_refresh_applies_selection() {
        let mock = Arc::new(
            MockPgClient::new()
                .with_properties(vec![pg("A"), pg("B")])
                .await,
        );
        let (mut ctx, store) = context_with(mock.clone(), Some("B"), UnknownPropertyPolicy::Ignore);

        assert!(ctx.refresh().await);

        assert_eq!(ctx.properties().len(), 2);
        assert_eq!(ctx.active_id(), Some("B"));
        assert_eq!(stored(&store).as_deref(), Some("B"));
        assert_eq!(mock.call_counts().await.list_properties, 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_selection() {
        let mock = Arc::new(
            MockPgClient::new()
                .with_properties(vec![pg("A"), pg("B")])
                .await,
        );
        let (mut ctx, _store) = context_with(mock.clone(), None, UnknownPropertyPolicy::Ignore);
        ctx.refresh().await;
        ctx.switch_property("B").unwrap();

        mock.set_properties(vec![pg("C")]).await;
        mock.fail_next(ApiError::Network("offline".to_string())).await;
        assert!(!ctx.refresh().await);

        assert_eq!(ctx.properties().len(), 2);
        assert_eq!(ctx.active_id(), Some("B"));
        assert_in_sync(&ctx);
    }

    #[test]
    fn test_store_failure_does_not_block_selection() {
        struct BrokenStore;

        impl KeyValueStore for BrokenStore {
            fn get(&self, _: &str) -> std::result::Result<Option<String>, crate::error::StorageError> {
                Err(crate::error::StorageError::Poisoned)
            }
            fn set(&self, _: &str, _: &str) -> std::result::Result<(), crate::error::StorageError> {
                Err(crate::error::StorageError::Poisoned)
            }
            fn remove(&self, _: &str) -> std::result::Result<(), crate::error::StorageError> {
                Err(crate::error::StorageError::Poisoned)
            }
        }

        let mut ctx = PropertyContext::new(
            Arc::new(MockPgClient::new()),
            Arc::new(BrokenStore),
            PropertyScope::new(),
            UnknownPropertyPolicy::Ignore,
        );
        ctx.set_properties(vec![pg("A"), pg("B")]);
        ctx.switch_property("B").unwrap();

        assert_eq!(ctx.active_id(), Some("B"));
        assert_in_sync(&ctx);
    }
}
