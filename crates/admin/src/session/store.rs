//! Reactive session store.
//!
//! Holds the current [`AdminSession`] behind a `tokio::sync::watch`
//! channel. Every update is a full replacement that subscribers observe.
//! Complete sessions are mirrored to storage; anything else erases it.

use std::sync::Arc;

use tokio::sync::watch;

use super::storage::{MemoryStorage, SessionStorage};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{AdminSession, BearerToken};

/// The authenticated admin's session, shared by every part of a console.
///
/// Cheap to clone; clones share the same record and storage.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    tx: watch::Sender<AdminSession>,
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.tx.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty store backed by `storage`. Nothing is read until
    /// [`SessionStore::rehydrate`].
    #[must_use]
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                tx: watch::Sender::new(AdminSession::empty()),
                storage: Box::new(storage),
            }),
        }
    }

    /// Create a store that only lives as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Adopt the persisted session, if storage holds a complete one.
    ///
    /// The stored token field is authoritative. A corrupt or incomplete
    /// value is erased and the store stays empty. The adopted record is
    /// not written back.
    pub fn rehydrate(&self) -> Option<AdminSession> {
        let persisted = match self.inner.storage.load() {
            Ok(Some(persisted)) if persisted.is_complete() => persisted,
            Ok(Some(_)) => {
                tracing::warn!("Discarding incomplete persisted session");
                self.erase();
                return None;
            }
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable persisted session");
                self.erase();
                return None;
            }
        };

        let session = AdminSession::from(persisted);
        if let Some(id) = &session.id {
            set_sentry_user(id, Some(&session.email));
        }
        tracing::debug!(admin_id = ?session.id, "Rehydrated session");
        self.inner.tx.send_replace(session.clone());
        Some(session)
    }

    /// Replace the session wholesale.
    ///
    /// Persists the record when it has both a token and an admin id,
    /// erases storage otherwise. Storage failures are logged, never
    /// returned.
    pub fn update(&self, session: AdminSession) {
        match session.to_persisted() {
            Some(persisted) => {
                if let Err(e) = self.inner.storage.save(&persisted) {
                    tracing::warn!(error = %e, "Failed to persist session");
                }
                set_sentry_user(&persisted.admin.id, Some(&persisted.admin.email));
            }
            None => {
                self.erase();
                clear_sentry_user();
            }
        }
        self.inner.tx.send_replace(session);
    }

    /// Replace the session with the empty record.
    pub fn clear(&self) {
        self.update(AdminSession::empty());
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn current(&self) -> AdminSession {
        self.inner.tx.borrow().clone()
    }

    /// The current token, if the session has a non-empty one.
    #[must_use]
    pub fn token(&self) -> Option<BearerToken> {
        self.inner
            .tx
            .borrow()
            .token
            .clone()
            .filter(|token| !token.is_empty())
    }

    /// Whether a non-empty token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().is_authenticated()
    }

    /// Observe every replacement of the session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AdminSession> {
        self.inner.tx.subscribe()
    }

    fn erase(&self) {
        if let Err(e) = self.inner.storage.remove() {
            tracing::warn!(error = %e, "Failed to erase persisted session");
        }
    }
}
