use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::auth::SessionUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::DashboardData;
use super::service::StudentsService;

/// Dashboard data for the authenticated student
#[utoipa::path(
    get,
    path = "/api/students/dashboardData",
    responses(
        (status = 200, description = "Plant catalog, progress and humidity", body = DashboardData),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Caller is not a student")
    ),
    tag = "Students"
)]
#[instrument(skip_all)]
pub async fn get_dashboard_data(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<DashboardData>, AppError> {
    let data =
        StudentsService::dashboard_data(state.store.as_ref(), &state.sensor_config, user.uid())
            .await?;
    Ok(Json(data))
}
