use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::config::session::{SESSION_TTL_SECONDS, SessionConfig};
use crate::middleware::auth::SessionUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{LoginRequest, RegisterRequest, RegisterResponse, StatusResponse};
use super::service::AuthService;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid email, weak password or upstream rejection", body = ErrorResponse),
        (status = 403, description = "Admin secret missing or incorrect", body = ErrorResponse),
        (status = 429, description = "Too many registrations from this IP")
    ),
    tag = "Auth"
)]
#[instrument(skip_all)]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let uid = AuthService::register(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { uid })))
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = StatusResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Email locked out", body = ErrorResponse),
        (status = 500, description = "Identity service failure", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip_all)]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<StatusResponse>), AppError> {
    let token = AuthService::login(&state, dto).await?;
    let cookie = session_cookie(&state.session_config, token);
    Ok((jar.add(cookie), Json(StatusResponse::success())))
}

/// Log out
///
/// Clears the cookie unconditionally. The session is not revoked at the
/// identity service, so a captured cookie stays valid until its natural
/// expiry; this mirrors the deployed behavior and is a known limitation.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Cookie cleared", body = StatusResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip_all)]
pub async fn logout_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<StatusResponse>) {
    let removal = Cookie::build((state.session_config.cookie_name.clone(), ""))
        .path("/")
        .build();
    (jar.remove(removal), Json(StatusResponse::logged_out()))
}

/// Fetch the caller's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Stored profile merged with the resolved role", body = super::model::ProfileResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 404, description = "No profile document", body = ErrorResponse),
        (status = 500, description = "Document store failure", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip_all)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = AuthService::profile(&state, &user).await?;
    Ok(Json(profile))
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS))
        .build()
}
