//! Authentication endpoints.

use crate::client::{error_from_response, read_json, send};
use crate::error::{Result, ServerClientError};
use crate::types::{
    CredentialsRequest, LoginResponse, RefreshRequest, RefreshResponse, SignupRequest,
    VerifyRequest,
};
use cadence_core::types::{AuthTokens, User};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Authentication client for the catalog service.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Register a new account.
    pub async fn signup(&self, email: &str, password: &str, username: &str) -> Result<User> {
        let url = format!("{}/user/signup/", self.base_url);
        debug!(url = %url, email = %email, "Signing up");

        let request = SignupRequest {
            email,
            password,
            username,
        };
        let response = send(self.http.post(&url).json(&request)).await?;
        let user: User = read_json(response, "signup response").await?;

        info!(user_id = %user.id, username = %user.username, "Signup successful");
        Ok(user)
    }

    /// Check credentials and return the user.
    ///
    /// The service answers either with the user fields inline or wrapped
    /// in `result`; anything else is a malformed response.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let url = format!("{}/user/login/", self.base_url);
        debug!(url = %url, email = %email, "Attempting login");

        let request = CredentialsRequest { email, password };
        let response = send(self.http.post(&url).json(&request)).await?;

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            warn!(error = %err, "Login failed");
            return Err(err);
        }

        let user = response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ServerClientError::ParseError(format!("Failed to parse login response: {e}")))?
            .into_user()?;

        info!(user_id = %user.id, username = %user.username, "Login successful");
        Ok(user)
    }

    /// Issue an access/refresh token pair.
    pub async fn get_tokens(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let url = format!("{}/user/token/", self.base_url);
        debug!(url = %url, "Requesting tokens");

        let request = CredentialsRequest { email, password };
        let response = send(self.http.post(&url).json(&request)).await?;
        read_json(response, "token response").await
    }

    /// Mint a new access token from a refresh token.
    pub async fn refresh_token(&self, refresh: &str) -> Result<String> {
        let url = format!("{}/user/token/refresh/", self.base_url);
        debug!(url = %url, "Refreshing access token");

        let response = send(self.http.post(&url).json(&RefreshRequest { refresh })).await?;
        match read_json::<RefreshResponse>(response, "refresh response").await {
            Ok(body) => {
                debug!("Token refresh successful");
                Ok(body.access)
            }
            Err(ServerClientError::AuthFailed(message)) => {
                warn!("Token refresh failed: refresh token expired or invalid");
                Err(ServerClientError::TokenRefreshFailed(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Whether the service accepts `access`.
    ///
    /// Any failure, including a network error, counts as invalid.
    pub async fn verify_token(&self, access: &str) -> bool {
        let url = format!("{}/user/token/verify/", self.base_url);
        debug!(url = %url, "Verifying access token");

        match send(self.http.post(&url).json(&VerifyRequest { token: access })).await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Token verification request failed");
                false
            }
        }
    }
}
