use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::json;
use tracing::{instrument, warn};

use crate::config::sensor::SensorConfig;
use crate::services::store::{DocumentStore, StoreError, collections};
use crate::utils::errors::AppError;

use super::model::{DashboardData, HumidityPoint, plant_catalog};

pub struct StudentsService;

impl StudentsService {
    /// Assemble the student dashboard: static catalog, the student's progress
    /// map, and humidity. Profile and sensor reads degrade — a failure there
    /// produces an empty map or simulated readings, never an error response.
    #[instrument(skip(store, sensor))]
    pub async fn dashboard_data(
        store: &dyn DocumentStore,
        sensor: &SensorConfig,
        uid: &str,
    ) -> Result<DashboardData, AppError> {
        let progress = match store.get(collections::USERS, uid).await {
            Ok(doc) => doc
                .and_then(|fields| fields.get("plants").cloned())
                .unwrap_or_else(|| json!({})),
            Err(err) => {
                warn!(uid = %uid, error = %err, "Error leyendo progreso usuario");
                json!({})
            }
        };

        let mut history = match read_humidity_history(store, sensor).await {
            Ok(points) => points,
            Err(err) => {
                warn!(error = %err, "Error leyendo lecturas del sensor");
                Vec::new()
            }
        };

        history.sort_by_key(|point| point.ts);
        let humidity = history.last().map(|point| point.value);

        // No real readings: simulate so the dashboard still renders.
        let humidity = humidity.unwrap_or_else(simulated_humidity);
        if history.is_empty() {
            history = simulated_history(Utc::now());
        }

        Ok(DashboardData {
            plants: plant_catalog(),
            progress,
            humidity,
            humidity_history: history,
        })
    }
}

/// Humidity per reading is the rounded mean of the two probes. Readings
/// missing either probe or the timestamp are skipped.
async fn read_humidity_history(
    store: &dyn DocumentStore,
    sensor: &SensorConfig,
) -> Result<Vec<HumidityPoint>, StoreError> {
    let readings = store.list(&sensor.readings_path()).await?;

    let points = readings
        .into_iter()
        .filter_map(|doc| {
            let s1 = doc.fields.get("s1")?.as_i64()?;
            let s2 = doc.fields.get("s2")?.as_i64()?;
            let created_at = doc.fields.get("createdAt")?.as_str()?;
            let ts = DateTime::parse_from_rfc3339(created_at).ok()?.timestamp_millis();

            Some(HumidityPoint {
                ts,
                value: ((s1 + s2) as f64 / 2.0).round() as i64,
            })
        })
        .collect();

    Ok(points)
}

fn simulated_humidity() -> i64 {
    rand::thread_rng().gen_range(40..70)
}

fn simulated_history(now: DateTime<Utc>) -> Vec<HumidityPoint> {
    let now_ms = now.timestamp_millis();
    (0..4)
        .map(|i| HumidityPoint {
            ts: now_ms - (7 - i) * 60 * 60 * 1000,
            value: simulated_humidity(),
        })
        .collect()
}
