use anyhow::anyhow;
use chrono::Utc;
use serde_json::json;
use tracing::{error, instrument, warn};

use crate::services::store::{DocumentStore, Fields, collections};
use crate::utils::errors::AppError;

use super::model::{EstudianteProgreso, ProgresoDto};

pub struct MaestroService;

impl MaestroService {
    /// Join every `estudiante` profile with its progress record. A failed
    /// progress read degrades that row to placeholders instead of failing
    /// the listing.
    #[instrument(skip(store))]
    pub async fn list_estudiantes(
        store: &dyn DocumentStore,
    ) -> Result<Vec<EstudianteProgreso>, AppError> {
        let students = store
            .query_eq(collections::USERS, "role", &json!("estudiante"))
            .await
            .map_err(|err| {
                error!(error = %err, "/estudiantes query failed");
                AppError::internal(anyhow!("Error al cargar estudiantes"))
            })?;

        let mut listado = Vec::with_capacity(students.len());
        for student in students {
            let progreso = match store.get(collections::PROGRESOS, &student.id).await {
                Ok(doc) => doc,
                Err(err) => {
                    warn!(uid = %student.id, error = %err, "Error obteniendo progreso");
                    None
                }
            };

            let actividad = progreso
                .as_ref()
                .and_then(|fields| fields.get("actividad"))
                .and_then(|value| value.as_str())
                .unwrap_or("—")
                .to_string();
            let porcentaje = progreso
                .as_ref()
                .and_then(|fields| fields.get("porcentaje"))
                .and_then(|value| value.as_str())
                .unwrap_or("0%")
                .to_string();
            let updated_at = progreso
                .as_ref()
                .and_then(|fields| fields.get("updatedAt"))
                .and_then(|value| value.as_str())
                .map(str::to_string);

            listado.push(EstudianteProgreso {
                uid: student.id,
                email: student
                    .fields
                    .get("email")
                    .and_then(|value| value.as_str())
                    .map(str::to_string),
                actividad,
                progreso: porcentaje,
                updated_at,
            });
        }

        Ok(listado)
    }

    /// Create or overwrite a student's progress record.
    #[instrument(skip(store))]
    pub async fn upsert_progreso(
        store: &dyn DocumentStore,
        dto: ProgresoDto,
    ) -> Result<(), AppError> {
        let fields: Fields = json!({
            "actividad": dto.actividad,
            "porcentaje": dto.porcentaje.unwrap_or_else(|| "0%".to_string()),
            "updatedAt": Utc::now().to_rfc3339(),
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        store
            .merge(collections::PROGRESOS, &dto.uid, fields)
            .await
            .map_err(|err| {
                error!(uid = %dto.uid, error = %err, "/progreso write failed");
                AppError::internal(anyhow!("No se pudo registrar el progreso"))
            })
    }
}
