//! Identity service adapter.
//!
//! Wraps the external identity provider: account creation, password
//! verification, role claims, and session token issuance/verification.
//! Passwords live only in the provider; this application never persists them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod http;
mod memory;

pub use http::HttpIdentityService;
pub use memory::MemoryIdentityService;

/// Claims carried by a verified session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account uid.
    pub sub: String,
    /// Role claim, if one has been set on the account.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Short-lived credential returned by a successful password verification.
/// Only ever exchanged for a session token; never returned to clients.
#[derive(Debug, Clone)]
pub struct PasswordGrant {
    pub uid: String,
    pub token: String,
}

/// Account listing entry, used by the profile reconciliation job.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub uid: String,
    pub email: String,
    pub role: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the request (bad credentials, duplicate email,
    /// malformed input). The message is the upstream error code and is safe
    /// to surface to clients.
    #[error("{0}")]
    Rejected(String),
    /// The session token is missing, malformed, expired or revoked.
    #[error("Sesión inválida o expirada")]
    InvalidSession,
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Unexpected(String),
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an account, returning the new uid.
    async fn create_user(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// Set the role custom claim on an account. Tokens minted afterwards
    /// embed the claim; existing tokens keep the stale value until reissued.
    async fn set_role_claim(&self, uid: &str, role: &str) -> Result<(), IdentityError>;

    /// Verify an email/password pair, returning a short-lived grant.
    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordGrant, IdentityError>;

    /// Exchange a password grant for a session token valid for `ttl_seconds`.
    async fn create_session_token(
        &self,
        grant: &PasswordGrant,
        ttl_seconds: i64,
    ) -> Result<String, IdentityError>;

    /// Verify a session token. With `check_revoked` the provider is consulted
    /// so revoked or deleted accounts fail even while the signature is valid.
    async fn verify_session_token(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, IdentityError>;

    /// List all accounts. Used by the `repair-profiles` reconciliation job.
    async fn list_users(&self) -> Result<Vec<IdentityRecord>, IdentityError>;
}
