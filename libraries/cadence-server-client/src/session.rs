//! Authenticated session with persisted tokens.

use crate::client::ApiClient;
use crate::error::{Result, ServerClientError};
use cadence_core::types::{Track, TrackId, User};
use cadence_core::KeyValueStore;
use cadence_storage::{SessionStore, StoredSession};
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Logged-in state on top of an [`ApiClient`].
///
/// The user and tokens are mirrored into a [`KeyValueStore`] so a later
/// process can [`restore`](AuthSession::restore) them.
pub struct AuthSession<S: KeyValueStore> {
    client: ApiClient,
    storage: SessionStore<S>,
    current: RwLock<Option<StoredSession>>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// A logged-out session; call [`Self::restore`] to pick up saved state.
    pub fn new(client: ApiClient, store: S) -> Self {
        Self {
            client,
            storage: SessionStore::new(store),
            current: RwLock::new(None),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Load the saved session, if any.
    pub async fn restore(&self) -> Result<Option<User>> {
        let saved = self.storage.load()?;
        let user = saved.as_ref().map(|s| s.user.clone());
        if let Some(user) = &user {
            info!(user_id = %user.id, username = %user.username, "Restored session");
        }
        *self.current.write().await = saved;
        Ok(user)
    }

    /// Log in and persist the issued tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let auth = self.client.auth();
        let user = auth.login(email, password).await?;
        let tokens = auth.get_tokens(email, password).await?;

        let session = StoredSession::new(user.clone(), tokens);
        self.storage.save(&session)?;
        *self.current.write().await = Some(session);

        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Register, then log in with the same credentials.
    pub async fn signup(&self, email: &str, password: &str, username: &str) -> Result<User> {
        self.client.auth().signup(email, password, username).await?;
        self.login(email, password).await
    }

    /// Forget the user and tokens.
    pub async fn logout(&self) -> Result<()> {
        *self.current.write().await = None;
        self.storage.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn user(&self) -> Option<User> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Whether the service still accepts the current access token.
    pub async fn verify(&self) -> bool {
        match self.access_token().await {
            Some(access) => self.client.auth().verify_token(&access).await,
            None => false,
        }
    }

    /// Mint and persist a new access token.
    pub async fn refresh(&self) -> Result<String> {
        let refresh = self
            .current
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
            .ok_or(ServerClientError::AuthRequired)?;

        let access = self.client.auth().refresh_token(&refresh).await?;
        self.storage.save_access_token(&access)?;
        if let Some(session) = self.current.write().await.as_mut() {
            session.access_token.clone_from(&access);
        }
        Ok(access)
    }

    /// Run `operation` with the access token, refreshing once on an auth
    /// failure.
    ///
    /// When the refresh itself is rejected the session is cleared.
    pub async fn with_auto_refresh<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let access = self
            .access_token()
            .await
            .ok_or(ServerClientError::AuthRequired)?;

        match operation(access).await {
            Err(e) if e.is_auth_failure() => {
                warn!(error = %e, "Access token rejected, attempting refresh");
                match self.refresh().await {
                    Ok(access) => operation(access).await,
                    Err(refresh_err) => {
                        if refresh_err.is_auth_failure() {
                            warn!(error = %refresh_err, "Refresh rejected, logging out");
                            self.logout().await?;
                        }
                        Err(refresh_err)
                    }
                }
            }
            result => result,
        }
    }

    // ===== Server-side favorites =====

    pub async fn favorite_tracks(&self) -> Result<Vec<Track>> {
        let favorites = &self.client.favorites();
        self.with_auto_refresh(move |access| async move {
            favorites.get_favorite_tracks(&access).await
        })
        .await
    }

    pub async fn add_favorite(&self, id: TrackId) -> Result<()> {
        let favorites = &self.client.favorites();
        self.with_auto_refresh(move |access| async move {
            favorites.add_to_favorites(id, &access).await
        })
        .await
    }

    pub async fn remove_favorite(&self, id: TrackId) -> Result<()> {
        let favorites = &self.client.favorites();
        self.with_auto_refresh(move |access| async move {
            favorites.remove_from_favorites(id, &access).await
        })
        .await
    }
}
