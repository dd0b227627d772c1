//! The console handle.
//!
//! Bundles configuration, the backend client, the session store and the
//! profile verifier. Feature handles (lists, hero images, profile, reset)
//! are built from it and share its client and session.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::instrument;

use hadi_books_core::Email;

use crate::api::BackendClient;
use crate::config::ConsoleConfig;
use crate::dashboard::{self, DashboardStats};
use crate::error::ConsoleError;
use crate::hero::HeroImageManager;
use crate::listing::{OrderList, OrderSource, ProductList, ProductSource};
use crate::models::AdminSession;
use crate::profile::ProfileEditor;
use crate::reset::ResetFlow;
use crate::session::{
    FileStorage, MemoryStorage, ProfileVerifier, SessionStorage, SessionStore, VerifyError,
    VerifyOutcome,
};
use crate::validation::ValidationError;

/// One admin console.
///
/// Cheap to clone; clones share the client and session.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: BackendClient,
    store: SessionStore,
    verifier: ProfileVerifier,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("backend_url", &self.inner.config.backend_url.as_str())
            .field("session", &self.inner.store)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create a console that keeps its session in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the HTTP client fails to build.
    pub fn new(
        config: ConsoleConfig,
        storage: impl SessionStorage + 'static,
    ) -> Result<Self, ConsoleError> {
        let client = BackendClient::from_config(&config)
            .map_err(|e| ConsoleError::api(e, "Failed to create HTTP client"))?;
        let store = SessionStore::new(storage);
        let verifier = ProfileVerifier::new(client.clone(), store.clone(), config.profile_retry);
        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                store,
                verifier,
            }),
        })
    }

    /// Create a console whose session lives in the file named by the
    /// configuration.
    ///
    /// # Errors
    ///
    /// See [`Console::new`].
    pub fn with_session_file(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let storage = FileStorage::new(config.session_file.clone());
        Self::new(config, storage)
    }

    /// Create a console whose session ends with the process.
    ///
    /// # Errors
    ///
    /// See [`Console::new`].
    pub fn in_memory(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        Self::new(config, MemoryStorage::new())
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Restore the persisted session, if any, and verify it.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Verify` when verification fails. The session
    /// has been cleared if the token was rejected and kept otherwise.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<AdminSession, ConsoleError> {
        if self.inner.store.rehydrate().is_none() {
            return Ok(AdminSession::empty());
        }
        self.verify_profile().await
    }

    /// Check the current token against the backend and refresh the
    /// profile fields.
    ///
    /// # Errors
    ///
    /// See [`Console::initialize`].
    pub async fn verify_profile(&self) -> Result<AdminSession, ConsoleError> {
        match self.inner.verifier.verify().await? {
            VerifyOutcome::Verified(session) => Ok(session),
            VerifyOutcome::NoToken | VerifyOutcome::Superseded => Ok(self.inner.store.current()),
        }
    }

    /// Sign in and verify the new session.
    ///
    /// A verification failure other than a rejected token is logged and
    /// the login still stands.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` for a malformed email (no request
    /// is made), `ConsoleError::Api` if the backend refuses the
    /// credentials, or `ConsoleError::Verify` if the new token is rejected.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminSession, ConsoleError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        let response = self
            .inner
            .client
            .login(&email, password)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to login"))?;

        self.inner
            .store
            .update(AdminSession::authenticated(response.token, response.admin));

        match self.verify_profile().await {
            Err(ConsoleError::Verify(VerifyError::Request(e))) => {
                tracing::warn!(error = %e, "Profile check after login failed");
                Ok(self.inner.store.current())
            }
            other => other,
        }
    }

    /// Sign out. The local session is cleared even if the backend call
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the backend call failed; the session
    /// is already cleared by then.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        let result = match self.inner.store.token() {
            Some(token) => self.inner.client.logout(&token).await.map(|_| ()),
            None => Ok(()),
        };
        self.inner.store.clear();
        tracing::info!("Admin logged out");
        result.map_err(|e| ConsoleError::api(e, "Logout failed"))
    }

    /// A controller over the catalog.
    #[must_use]
    pub fn products(&self) -> ProductList {
        ProductList::new(
            ProductSource::new(self.inner.client.clone(), self.inner.store.clone()),
            self.inner.config.page_size,
            self.inner.config.search_debounce,
        )
    }

    /// A controller over the order book.
    #[must_use]
    pub fn orders(&self) -> OrderList {
        OrderList::new(
            OrderSource::new(self.inner.client.clone(), self.inner.store.clone()),
            self.inner.config.page_size,
            self.inner.config.search_debounce,
        )
    }

    #[must_use]
    pub fn hero_images(&self) -> HeroImageManager {
        HeroImageManager::new(self.inner.client.clone(), self.inner.store.clone())
    }

    #[must_use]
    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::new(self.inner.client.clone(), self.inner.store.clone())
    }

    /// A fresh password-reset flow. Needs no session.
    #[must_use]
    pub fn reset_flow(&self) -> ResetFlow {
        ResetFlow::new(self.inner.client.clone(), self.inner.config.notice_delay)
    }

    /// Fetch the dashboard figures.
    ///
    /// # Errors
    ///
    /// See [`dashboard::load`].
    pub async fn dashboard(&self) -> Result<DashboardStats, ConsoleError> {
        dashboard::load(&self.inner.client, &self.inner.store).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn console() -> Console {
        let config = ConsoleConfig::for_backend(url::Url::parse("http://127.0.0.1:9").unwrap());
        Console::in_memory(config).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_without_session_makes_no_request() {
        let console = console();
        assert_eq!(console.initialize().await.unwrap(), AdminSession::empty());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email() {
        let console = console();
        let err = console
            .login("not-an-email", &SecretString::from("pw".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        assert!(!console.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_without_session_is_quiet() {
        let console = console();
        console.logout().await.unwrap();
        assert_eq!(console.session().current(), AdminSession::empty());
    }

    #[test]
    fn test_lists_use_configured_page_size() {
        let console = console();
        assert_eq!(console.products().state().page_size, 10);
        assert_eq!(console.orders().state().page_size, 10);
    }
}
