use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::modules::auth::model::StatusResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{UpdateUserDto, UsersResponse};
use super::service::UsersService;

/// List every user profile (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All user profiles", body = UsersResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Document store failure")
    ),
    tag = "Users"
)]
#[instrument(skip_all)]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = UsersService::list_users(state.store.as_ref()).await?;
    Ok(Json(UsersResponse { users }))
}

/// Update a user's display name (admin only)
#[utoipa::path(
    put,
    path = "/api/users/{uid}",
    request_body = UpdateUserDto,
    params(("uid" = String, Path, description = "Profile document id")),
    responses(
        (status = 200, description = "Display name updated", body = StatusResponse),
        (status = 400, description = "Missing displayName"),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Document store failure")
    ),
    tag = "Users"
)]
#[instrument(skip_all, fields(uid = %uid))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<StatusResponse>, AppError> {
    UsersService::update_display_name(state.store.as_ref(), &uid, &dto.display_name).await?;
    Ok(Json(StatusResponse::ok()))
}
