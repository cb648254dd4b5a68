//! Active property scope shared between the property context and the client

use std::sync::{Arc, RwLock};

/// Handle carrying the active property id into the HTTP client.
///
/// The property context owns the writes; the client reads it once per
/// request when it resolves the URL. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct PropertyScope {
    active: Arc<RwLock<Option<String>>>,
}

impl PropertyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current active property id
    pub fn get(&self) -> Option<String> {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the active property id
    pub fn set(&self, id: Option<&str>) {
        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = id.map(str::to_string);
    }

    /// Substitute `placeholder` in `path` with the active id.
    ///
    /// Without an active id (or an empty placeholder) the path comes back
    /// unchanged, placeholder included.
    pub fn resolve(&self, path: &str, placeholder: &str) -> String {
        if placeholder.is_empty() || !path.contains(placeholder) {
            return path.to_string();
        }

        match self.get() {
            Some(id) => path.replace(placeholder, &id),
            None => path.to_string(),
        }
    }
}
