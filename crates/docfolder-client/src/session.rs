//! Explicit session object owning the bearer token.
//!
//! # Design
//! - The token lives in memory and is mirrored to a [`TokenStore`].
//! - Two states only: [`AuthState::Authenticated`] and [`AuthState::Unauthenticated`].
//! - Writes are last-write-wins. The lock spans the store call and the memory
//!   write together, and is never held across an `.await`.

use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::notify::{AuthEvent, NoopNotifier, StatusNotifier};
use crate::store::{MemoryTokenStore, TokenStore};

/// Authentication state of a [`Session`].
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// A bearer token is available.
    Authenticated {
        /// Token exactly as issued by `/login`.
        token: String,
    },
    /// No token is held.
    #[default]
    Unauthenticated,
}

impl AuthState {
    /// Token carried by the state, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token } => Some(token),
            Self::Unauthenticated => None,
        }
    }

    /// Returns `true` when a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Human-readable status line.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Authenticated { .. } => "Authenticated",
            Self::Unauthenticated => "Not authenticated",
        }
    }

    fn from_token(token: Option<String>) -> Self {
        token
            .filter(|token| !token.is_empty())
            .map_or(Self::Unauthenticated, |token| Self::Authenticated { token })
    }
}

impl Debug for AuthState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated { .. } => formatter
                .debug_struct("Authenticated")
                .field("token", &"<redacted>")
                .finish(),
            Self::Unauthenticated => formatter.write_str("Unauthenticated"),
        }
    }
}

/// Session state shared by every request issued through a client.
pub struct Session {
    state: Mutex<AuthState>,
    store: Arc<dyn TokenStore>,
    notifier: Arc<dyn StatusNotifier>,
}

impl Session {
    /// Restore the session from `store`.
    ///
    /// No notification is emitted; opening is not a transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open(
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Result<Self, StoreError> {
        let state = AuthState::from_token(store.load()?);
        tracing::debug!(
            authenticated = state.is_authenticated(),
            "session restored"
        );
        Ok(Self {
            state: Mutex::new(state),
            store,
            notifier,
        })
    }

    /// Unauthenticated session that keeps its token in memory only.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            state: Mutex::new(AuthState::Unauthenticated),
            store: Arc::new(MemoryTokenStore::new()),
            notifier: Arc::new(NoopNotifier),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.lock_state().clone()
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock_state().token().map(str::to_string)
    }

    /// Returns `true` when a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock_state().is_authenticated()
    }

    /// Store a freshly issued token and switch to the authenticated state.
    ///
    /// The token is persisted before memory is updated, so a failed write
    /// leaves the previous state untouched. The state lock covers both
    /// writes so storage always mirrors memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted.
    pub fn authenticate(&self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        {
            let mut state = self.lock_state();
            self.store.save(&token)?;
            *state = AuthState::Authenticated { token };
        }
        tracing::info!("session authenticated");
        self.notifier.notify(AuthEvent::LoggedIn);
        Ok(())
    }

    /// Drop the token regardless of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed; the
    /// in-memory token is cleared either way.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.clear(AuthEvent::LoggedOut)
    }

    /// Drop the token after the server rejected it.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed; the
    /// in-memory token is cleared either way.
    pub fn expire(&self) -> Result<(), StoreError> {
        self.clear(AuthEvent::Expired)
    }

    fn clear(&self, event: AuthEvent) -> Result<(), StoreError> {
        let (was_authenticated, persisted) = {
            let mut state = self.lock_state();
            let previous = state.is_authenticated();
            *state = AuthState::Unauthenticated;
            (previous, self.store.clear())
        };
        tracing::info!(
            event = event.as_str(),
            was_authenticated,
            "session cleared"
        );
        self.notifier.notify(event);
        persisted
    }

    fn lock_state(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for Session {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("state", &*self.lock_state())
            .finish_non_exhaustive()
    }
}
