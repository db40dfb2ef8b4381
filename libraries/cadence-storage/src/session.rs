//! Persisted authentication session
//!
//! The user record is stored as JSON under `user`; the tokens are stored
//! as plain strings under `accessToken` and `refreshToken`.

use cadence_core::types::{AuthTokens, User};
use cadence_core::{KeyValueStore, Result};
use tracing::{debug, warn};

const USER_KEY: &str = "user";
const ACCESS_TOKEN_KEY: &str = "accessToken";
const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// A session restored from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub user: User,
    pub access_token: String,
    /// Missing when only an access token was ever saved
    pub refresh_token: Option<String>,
}

impl StoredSession {
    /// Build a session from a freshly issued token pair
    pub fn new(user: User, tokens: AuthTokens) -> Self {
        Self {
            user,
            access_token: tokens.access,
            refresh_token: Some(tokens.refresh),
        }
    }
}

/// Reads and writes the session keys of a [`KeyValueStore`]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Restore the saved session
    ///
    /// Returns `None` when either the user or the access token is missing,
    /// or when the stored user record can't be decoded.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let Some(raw_user) = self.store.get(USER_KEY)? else {
            return Ok(None);
        };
        let Some(access_token) = self.store.get(ACCESS_TOKEN_KEY)? else {
            debug!("Stored user has no access token");
            return Ok(None);
        };

        let user: User = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Stored user is malformed, ignoring session");
                return Ok(None);
            }
        };

        Ok(Some(StoredSession {
            user,
            access_token,
            refresh_token: self.store.get(REFRESH_TOKEN_KEY)?,
        }))
    }

    /// Persist a session, replacing any previous one
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        let user = serde_json::to_string(&session.user)?;
        self.store.set(USER_KEY, &user)?;
        self.store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        match &session.refresh_token {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, refresh)?,
            None => self.store.remove(REFRESH_TOKEN_KEY)?,
        }

        debug!(user_id = %session.user.id, "Saved session");
        Ok(())
    }

    /// Replace only the access token (after a refresh)
    pub fn save_access_token(&self, access_token: &str) -> Result<()> {
        self.store.set(ACCESS_TOKEN_KEY, access_token)
    }

    /// Forget the session
    pub fn clear(&self) -> Result<()> {
        self.store.remove(USER_KEY)?;
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        debug!("Cleared session");
        Ok(())
    }
}
