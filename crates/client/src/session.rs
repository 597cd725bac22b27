//! Session store: persisted tokens plus the in-memory user identity.
//!
//! The store is an explicit value shared behind an `Arc`; the request
//! pipeline reads the access token from it on every call. Dependents observe
//! changes through a `watch` channel of [`AuthState`] and a `broadcast` of
//! [`SessionEvent`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{broadcast, watch};

use sasb_auth::{AccessError, Permission, TokenPair, UserIdentity, authorize};

use crate::error::{ClientError, StorageError};
use crate::storage::{TokenKey, TokenStore};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadingState {
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// `initialize()` has not resolved; no authorization decision may be made.
    Loading,
    Anonymous,
    Authenticated(UserIdentity),
}

impl AuthState {
    pub fn loading_state(&self) -> LoadingState {
        match self {
            AuthState::Loading => LoadingState::Loading,
            AuthState::Anonymous | AuthState::Authenticated(_) => LoadingState::Ready,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_state() == LoadingState::Loading
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Loading | AuthState::Anonymous => None,
        }
    }
}

/// Why the session was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    Logout,
    RefreshFailed,
    InvalidStoredSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(UserIdentity),
    LoggedOut,
    /// Dependents should route the user back to the login entry point.
    LoginRequired(ClearReason),
}

/// What UI-facing code sees: `{ user, is_loading }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub user: Option<UserIdentity>,
    pub is_loading: bool,
}

/// Source of the identity bound to the current access token (`GET /me/`).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn fetch_identity(&self) -> Result<UserIdentity, ClientError>;
}

pub struct Session {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    events: broadcast::Sender<SessionEvent>,
    initialized: AtomicBool,
    /// Bumped by every clear; lets a caller tell whether the pipeline already
    /// invalidated the session during its call.
    clears: AtomicU64,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.state.borrow())
            .field("initialized", &self.initialized.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Empty session in the `Loading` state.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            state,
            events,
            initialized: AtomicBool::new(false),
            clears: AtomicU64::new(0),
        }
    }

    /// Resolve the persisted token pair into an authenticated or anonymous
    /// session. Only the first call does any work.
    pub async fn initialize(&self, identity: &dyn IdentityProvider) -> AuthState {
        if self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!("session already initialized");
            return self.state();
        }

        if self.store.get(TokenKey::Access).is_none() {
            tracing::info!("no stored session");
            self.state.send_replace(AuthState::Anonymous);
            return self.state();
        }

        let clears = self.clear_count();
        match identity.fetch_identity().await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "session restored");
                self.set_user(user);
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored session rejected");
                self.clear_unless_cleared_since(clears, ClearReason::InvalidStoredSession);
            }
        }
        self.state()
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(TokenKey::Access)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(TokenKey::Refresh)
    }

    /// Persist both tokens, overwriting any previous pair.
    pub fn set_tokens(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.store.store_pair(pair)
    }

    pub(crate) fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TokenKey::Access, token)
    }

    pub(crate) fn set_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TokenKey::Refresh, token)
    }

    /// Replace the current user wholesale.
    pub fn set_user(&self, user: UserIdentity) {
        self.state.send_replace(AuthState::Authenticated(user));
    }

    pub(crate) fn mark_logged_in(&self, user: UserIdentity) {
        self.initialized.store(true, Ordering::Release);
        self.set_user(user.clone());
        let _ = self.events.send(SessionEvent::LoggedIn(user));
    }

    /// Remove both tokens and the user, then signal that login is required.
    /// Calling it again leaves the same state behind.
    pub fn clear(&self) {
        self.clear_with(ClearReason::Logout);
    }

    pub fn logout(&self) {
        let had_user = self.user().is_some();
        self.clear_with(ClearReason::Logout);
        if had_user {
            let _ = self.events.send(SessionEvent::LoggedOut);
        }
    }

    pub(crate) fn clear_with(&self, reason: ClearReason) {
        self.clears.fetch_add(1, Ordering::AcqRel);
        if let Err(err) = self.store.clear() {
            tracing::error!(error = %err, "failed to remove stored tokens");
        }
        self.state.send_replace(AuthState::Anonymous);
        tracing::info!(?reason, "session cleared");
        let _ = self.events.send(SessionEvent::LoginRequired(reason));
    }

    pub(crate) fn clear_count(&self) -> u64 {
        self.clears.load(Ordering::Acquire)
    }

    /// Clear with `reason` unless a clear already happened after `seen` was
    /// taken from [`Session::clear_count`].
    pub(crate) fn clear_unless_cleared_since(&self, seen: u64, reason: ClearReason) {
        if self.clear_count() == seen {
            self.clear_with(reason);
        } else {
            tracing::debug!(?reason, "session already cleared");
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.state.borrow().user().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn view(&self) -> SessionView {
        let state = self.state.borrow();
        SessionView {
            user: state.user().cloned(),
            is_loading: state.is_loading(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Check `permission` against the current user.
    pub fn authorize(&self, permission: Permission) -> Result<(), AccessError> {
        authorize(self.state.borrow().user(), permission)
    }
}
