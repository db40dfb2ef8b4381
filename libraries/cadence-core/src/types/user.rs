/// User and credential types
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// An authenticated catalog user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    #[serde(rename = "_id")]
    pub id: UserId,

    /// Login e-mail
    pub email: String,

    /// Display name
    pub username: String,
}

/// Access/refresh token pair issued by the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived bearer token
    pub access: String,

    /// Long-lived token used to mint new access tokens
    pub refresh: String,
}
