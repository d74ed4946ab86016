use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::modules::auth::model::StatusResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{EstudianteProgreso, ProgresoDto};
use super::service::MaestroService;

/// List students with their progress (teacher only)
#[utoipa::path(
    get,
    path = "/api/maestro/estudiantes",
    responses(
        (status = 200, description = "Students with progress summaries", body = [EstudianteProgreso]),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not a teacher"),
        (status = 500, description = "Document store failure")
    ),
    tag = "Maestro"
)]
#[instrument(skip_all)]
pub async fn get_estudiantes(
    State(state): State<AppState>,
) -> Result<Json<Vec<EstudianteProgreso>>, AppError> {
    let estudiantes = MaestroService::list_estudiantes(state.store.as_ref()).await?;
    Ok(Json(estudiantes))
}

/// Register or update a student's progress (teacher only)
#[utoipa::path(
    post,
    path = "/api/maestro/progreso",
    request_body = ProgresoDto,
    responses(
        (status = 200, description = "Progress recorded", body = StatusResponse),
        (status = 400, description = "Missing uid or actividad"),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not a teacher"),
        (status = 500, description = "Document store failure")
    ),
    tag = "Maestro"
)]
#[instrument(skip_all)]
pub async fn post_progreso(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ProgresoDto>,
) -> Result<Json<StatusResponse>, AppError> {
    MaestroService::upsert_progreso(state.store.as_ref(), dto).await?;
    Ok(Json(StatusResponse::ok()))
}
