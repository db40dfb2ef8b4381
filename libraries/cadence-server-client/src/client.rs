//! Main catalog client.

use crate::auth::AuthClient;
use crate::catalog::CatalogClient;
use crate::error::{Result, ServerClientError};
use crate::favorites::FavoritesClient;
use crate::types::{ClientConfig, ErrorBody};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for the catalog and auth API.
///
/// Stateless apart from the connection pool: tokens are passed per call.
/// [`crate::AuthSession`] layers token storage and refresh on top.
///
/// # Example
///
/// ```ignore
/// use cadence_server_client::{ApiClient, ClientConfig};
///
/// let client = ApiClient::new(ClientConfig::default())?;
/// let tracks = client.catalog().get_all_tracks().await?;
/// println!("{} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        debug!(base_url = %base_url, "Created catalog client");
        Ok(Self { http, base_url })
    }

    /// The normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Signup, login and token endpoints.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url)
    }

    /// Track and playlist listings.
    pub fn catalog(&self) -> CatalogClient<'_> {
        CatalogClient::new(&self.http, &self.base_url)
    }

    /// Server-side favorites of an authenticated user.
    pub fn favorites(&self) -> FavoritesClient<'_> {
        FavoritesClient::new(&self.http, &self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| ServerClientError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ServerClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Send a request, classifying connection failures.
pub(crate) async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(ServerClientError::from_send)
}

/// Turn a non-success response into an error.
///
/// The message comes from a JSON `{message}` or `{detail}` body when there
/// is one, otherwise `HTTP <status>`. 401 is an auth failure.
pub(crate) async fn error_from_response(response: Response) -> ServerClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    if status == StatusCode::UNAUTHORIZED {
        ServerClientError::AuthFailed(message)
    } else {
        ServerClientError::ServerError {
            status: status.as_u16(),
            message,
        }
    }
}

/// Check the status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| ServerClientError::ParseError(format!("Failed to parse {what}: {e}")))
}
