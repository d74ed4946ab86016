//! Role-based authorization middleware.
//!
//! The role lives in two places: as a custom claim on the session token and
//! as the `role` field of the UserProfile document. The claim is checked
//! first (no extra I/O); the document is the durable fallback when the claim
//! is absent or stale. A document match backfills the request context so the
//! rest of the request sees the resolved role.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::middleware::auth::SessionUser;
use crate::modules::users::model::Role;
use crate::services::store::{DocumentStore, collections};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Which source satisfied the role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedRole {
    FromClaim(Role),
    FromDocument(Role),
}

impl ResolvedRole {
    pub fn role(self) -> Role {
        match self {
            ResolvedRole::FromClaim(role) | ResolvedRole::FromDocument(role) => role,
        }
    }
}

/// Resolve the caller's role against an acceptable set, cache-then-source.
///
/// The token claim wins when it is in the set. Otherwise one UserProfile read
/// decides; any store error is a denial, never an allow.
pub async fn resolve_role(
    user: &SessionUser,
    store: &dyn DocumentStore,
    allowed: &[Role],
) -> Result<ResolvedRole, AppError> {
    if let Some(claim) = user.role().and_then(|raw| raw.parse::<Role>().ok()) {
        if allowed.contains(&claim) {
            return Ok(ResolvedRole::FromClaim(claim));
        }
    }

    let doc = store
        .get(collections::USERS, user.uid())
        .await
        .map_err(|err| {
            warn!(uid = %user.uid(), error = %err, "role fallback lookup failed");
            AppError::forbidden("Forbidden")
        })?;

    let doc_role = doc
        .as_ref()
        .and_then(|fields| fields.get("role"))
        .and_then(|value| value.as_str())
        .and_then(|raw| raw.parse::<Role>().ok());

    match doc_role {
        Some(role) if allowed.contains(&role) => Ok(ResolvedRole::FromDocument(role)),
        _ => Err(AppError::forbidden("Forbidden")),
    }
}

/// Middleware that admits only callers holding one of `allowed_roles`.
///
/// On success the verified `SessionUser` — with the role backfilled when the
/// document satisfied the check — is inserted into the request extensions for
/// downstream extractors.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<Role>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let mut user = SessionUser::from_request_parts(&mut parts, &state).await?;
    let resolved = resolve_role(&user, state.store.as_ref(), &allowed_roles).await?;

    if let ResolvedRole::FromDocument(role) = resolved {
        user.0.role = Some(role.as_str().to_string());
    }
    parts.extensions.insert(user);

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_maestro(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![Role::Maestro]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_estudiante(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, vec![Role::Estudiante]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
