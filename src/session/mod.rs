//! Session context
//!
//! Single source of truth for who is signed in. The state starts
//! `Uninitialized`, becomes `Authenticated` or `Unauthenticated` after the
//! first `initialize`, and moves back to `Unauthenticated` on logout or
//! when the client reports an unrecoverable 401.
//!
//! Only those last two revoke the session. A failed check that never got an
//! answer from the server leaves the state unauthenticated but not revoked,
//! so saved credentials survive an outage.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::client::{Credentials, SessionApi, UnauthorizedHandler, UserInfo};
use crate::error::{ContextError, Result};

/// Session state machine
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The initial "who am I" check has not completed
    Uninitialized,
    Authenticated(UserInfo),
    Unauthenticated,
}

/// Tracks the authenticated user
pub struct SessionContext {
    api: Arc<dyn SessionApi>,
    state: Arc<RwLock<SessionState>>,
    revoked: Arc<AtomicBool>,
}

impl SessionContext {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(SessionState::Uninitialized)),
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resolve the current user once.
    ///
    /// Only the first call reaches the server; later calls return the
    /// known user. Failures leave the session unauthenticated and are
    /// never returned.
    pub async fn initialize(&self) -> Option<UserInfo> {
        if !self.is_loading() {
            return self.user();
        }

        match self.api.current_user().await {
            Ok(user) => {
                debug!("Session restored for {}", user.id);
                self.replace(SessionState::Authenticated(user.clone()));
                Some(user)
            }
            Err(err) => {
                debug!("No active session: {}", err);
                self.replace(SessionState::Unauthenticated);
                None
            }
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<UserInfo> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True until the initial session check completes
    pub fn is_loading(&self) -> bool {
        self.state() == SessionState::Uninitialized
    }

    /// The signed-in user, or an error asking the operator to log in
    pub fn require_user(&self) -> Result<UserInfo> {
        self.user()
            .ok_or_else(|| ContextError::NotAuthenticated.into())
    }

    /// Whether the server rejected the session or the operator logged out
    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }

    /// Replace the user without touching the server
    #[allow(dead_code)]
    pub fn set_user(&self, user: Option<UserInfo>) {
        self.replace(match user {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Unauthenticated,
        });
    }

    /// Sign in with credentials; the state is unchanged on failure
    pub async fn login(&self, credentials: &Credentials) -> Result<UserInfo> {
        let user = self.api.login(credentials).await?;
        self.revoked.store(false, Ordering::SeqCst);
        self.replace(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Sign out.
    ///
    /// The server is notified on a best-effort basis; the local user is
    /// cleared either way.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!("Logout request failed: {}", err);
        }
        self.revoked.store(true, Ordering::SeqCst);
        self.replace(SessionState::Unauthenticated);
    }

    /// Callback for [`PgClient::on_unauthorized`](crate::client::PgClient::on_unauthorized)
    /// that drops the local session.
    pub fn unauthorized_handler(&self) -> UnauthorizedHandler {
        let state = self.state.clone();
        let revoked = self.revoked.clone();
        Arc::new(move || {
            revoked.store(true, Ordering::SeqCst);
            let mut guard = match state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = SessionState::Unauthenticated;
        })
    }

    fn replace(&self, next: SessionState) {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }
}
