use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One row of the teacher's student-progress listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstudianteProgreso {
    pub uid: String,
    pub email: Option<String>,
    pub actividad: String,
    pub progreso: String,
    pub updated_at: Option<String>,
}

/// DTO for registering or updating a student's progress.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProgresoDto {
    #[validate(length(min = 1, message = "Faltan datos"))]
    pub uid: String,
    #[validate(length(min = 1, message = "Faltan datos"))]
    pub actividad: String,
    /// Percentage string, e.g. `"40%"`. Defaults to `"0%"`.
    pub porcentaje: Option<String>,
}
