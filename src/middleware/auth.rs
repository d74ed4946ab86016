use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::services::identity::{IdentityService as _, SessionClaims};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extractor that verifies the session cookie and provides the caller's
/// verified claims. Verification asks the identity service for freshness,
/// so revoked sessions fail here even while their signature is still valid.
///
/// Role layers insert the (possibly role-backfilled) `SessionUser` into the
/// request extensions; extraction prefers that copy so a request is verified
/// at most once.
#[derive(Debug, Clone)]
pub struct SessionUser(pub SessionClaims);

impl SessionUser {
    pub fn uid(&self) -> &str {
        &self.0.sub
    }

    /// Role claim embedded in the session token, if any.
    pub fn role(&self) -> Option<&str> {
        self.0.role.as_deref()
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SessionUser>() {
            return Ok(user.clone());
        }

        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        let cookie = jar
            .get(&state.session_config.cookie_name)
            .ok_or_else(|| AppError::unauthenticated("Unauthorized: no cookie"))?;

        let claims = state
            .identity
            .verify_session_token(cookie.value(), true)
            .await
            .map_err(|err| {
                warn!(error = %err, "verificación de sesión fallida");
                AppError::unauthenticated("Unauthorized")
            })?;

        Ok(SessionUser(claims))
    }
}
