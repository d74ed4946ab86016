use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Entry of the static plant-care catalog shown on the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cuidados: Vec<String>,
}

/// One humidity sample, millisecond timestamp plus percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct HumidityPoint {
    pub ts: i64,
    pub value: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub plants: Vec<Plant>,
    /// The student's per-plant progress map, as stored on the profile.
    pub progress: Value,
    pub humidity: i64,
    pub humidity_history: Vec<HumidityPoint>,
}

/// The plant catalog is fixed content, not a document collection.
pub fn plant_catalog() -> Vec<Plant> {
    let plant = |id: &str, name: &str, description: &str, cuidados: &[&str]| Plant {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cuidados: cuidados.iter().map(|c| c.to_string()).collect(),
    };

    vec![
        plant(
            "lenteja",
            "Lenteja",
            "Semilla nutritiva y rápida de germinar. La lenteja es una planta pequeña \
             pertenece a la familia de las legumbres.",
            &[
                "Riego cada 2-3 días",
                "Luz indirecta o semisombra",
                "Sustrato suelto y drenante",
            ],
        ),
        plant(
            "limon",
            "Limón",
            "Árbol cítrico que requiere sol y espacio. Produce frutos con varios meses de \
             cuidado.",
            &[
                "Riego semanal profundo",
                "Sol directo 6+ horas",
                "Suelo con buen drenaje y fertilización",
            ],
        ),
        plant(
            "chile-piquin",
            "Chile piquín",
            "Planta pequeña que después de la flor, nacen chiles muy pequeños, redondos y \
             muy picosos que cambian de color al madurar",
            &[
                "Riego moderado",
                "Sol directo y calor",
                "Protección de heladas",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_three_plants() {
        let catalog = plant_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].id, "lenteja");
        assert!(catalog.iter().all(|plant| !plant.cuidados.is_empty()));
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let data = DashboardData {
            plants: plant_catalog(),
            progress: serde_json::json!({}),
            humidity: 55,
            humidity_history: vec![HumidityPoint { ts: 1, value: 55 }],
        };

        let value = serde_json::to_value(&data).unwrap();
        assert!(value.get("humidityHistory").is_some());
        assert!(value.get("humidity_history").is_none());
    }
}
