//! Command execution context
//!
//! Wires config, persisted state, the API client and the session and
//! property contexts together for a single command run.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use log::{debug, warn};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{PgClient, PropertyScope};
use crate::config::Config;
use crate::error::{ContextError, Result};
use crate::property::PropertyContext;
use crate::session::SessionContext;
use crate::storage::{
    KeyValueStore, MemoryStore, SELECTED_PROPERTY_KEY, SESSION_COOKIES_KEY, ScopedStore,
    SqliteStore,
};

/// Context for command execution.
///
/// - `client` carries the session cookies restored from the last run
/// - `session` tracks the signed-in user
/// - `properties` owns the active property and feeds it to `client`
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// API client shared by both contexts
    pub client: Arc<PgClient>,
    /// Session context
    pub session: SessionContext,
    /// Active-property context
    pub properties: PropertyContext,
    /// Persisted state, scoped to the API URL
    pub store: Arc<dyn KeyValueStore>,
    /// Output format preference
    pub format: OutputFormat,
    property_override: Option<String>,
}

impl CommandContext {
    /// Create a context from the config file and the default state store.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded, no API URL is configured,
    /// or the state store cannot be opened.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let backing = open_state_store(opts.state_dir.as_deref())?;
        Self::with_store(config, backing, opts)
    }

    /// Create a context on top of an explicit backing store
    pub fn with_store(
        config: Config,
        backing: Arc<dyn KeyValueStore>,
        opts: &GlobalOptions,
    ) -> Result<Self> {
        let api_url = config.api_url(opts.api_url_ref())?;
        let store: Arc<dyn KeyValueStore> = Arc::new(ScopedStore::for_api_url(backing, &api_url));

        let scope = PropertyScope::new();
        let client = Arc::new(
            PgClient::new(&api_url, scope.clone())?
                .with_endpoints(config.endpoints.clone())
                .with_placeholder(config.placeholder.clone()),
        );

        if let Some(saved) = store.get(SESSION_COOKIES_KEY)? {
            debug!("Restoring session cookies for {}", client.base_url());
            if let Err(err) = client.import_cookies(&saved) {
                warn!("Ignoring saved session cookies: {}", err);
            }
        }

        let session = SessionContext::new(client.clone());
        client.on_unauthorized(session.unauthorized_handler());
        client.on_unauthorized(Arc::new(|| {
            warn!("Session expired and could not be refreshed");
        }));

        // A --property override selects through a throwaway store so the
        // persisted selection is left alone.
        let selection_store: Arc<dyn KeyValueStore> = match opts.property_ref() {
            Some(id) => {
                let memory = MemoryStore::new();
                memory.set(SELECTED_PROPERTY_KEY, id)?;
                Arc::new(memory)
            }
            None => store.clone(),
        };

        let properties = PropertyContext::new(
            client.clone(),
            selection_store,
            scope,
            config.unknown_property,
        );

        let format = resolve_format(opts.format, &config);
        Ok(Self {
            config,
            client,
            session,
            properties,
            store,
            format,
            property_override: opts.property.clone(),
        })
    }

    /// Fetch the property list and settle the active selection.
    ///
    /// # Errors
    /// Fails if the server rejected the session, or if a `--property`
    /// override cannot be checked or names a property the user cannot manage.
    pub async fn load_properties(&mut self) -> Result<()> {
        let fetched = self.properties.refresh().await;

        if self.session.is_revoked() {
            return Err(ContextError::NotAuthenticated.into());
        }

        if let Some(ref id) = self.property_override {
            if !fetched {
                return Err(ContextError::PropertiesUnavailable(id.clone()).into());
            }
            if self.properties.active_id() != Some(id.as_str()) {
                return Err(ContextError::UnknownProperty(id.clone()).into());
            }
        }

        Ok(())
    }

    /// Whether this run selects its property through `--property`
    pub fn has_property_override(&self) -> bool {
        self.property_override.is_some()
    }

    /// Save session cookies for the next run, or drop them once the server
    /// rejected the session or the operator logged out.
    ///
    /// A run that never reached the server keeps what was saved.
    pub fn persist_session(&self) -> Result<()> {
        if self.session.is_revoked() {
            self.store.remove(SESSION_COOKIES_KEY)?;
            return Ok(());
        }

        match self.client.export_cookies()? {
            Some(cookies) => self.store.set(SESSION_COOKIES_KEY, &cookies)?,
            None => self.store.remove(SESSION_COOKIES_KEY)?,
        }
        Ok(())
    }
}

/// Flag or env value first, then the config preference, then table
fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| {
        config
            .preferences
            .format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    })
    .unwrap_or_default()
}

/// Open the SQLite state store, in `dir` or the default data directory
pub fn open_state_store(dir: Option<&str>) -> Result<Arc<dyn KeyValueStore>> {
    let store = match dir {
        Some(dir) => SqliteStore::open_at(Path::new(dir))?,
        None => SqliteStore::open()?,
    };
    Ok(Arc::new(store))
}
