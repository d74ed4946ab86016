use std::env;

/// Location of the humidity readings in the document store. The device writes
/// readings under `<collection>/<device_id>/readings`.
#[derive(Clone, Debug)]
pub struct SensorConfig {
    pub collection: String,
    pub device_id: String,
}

impl SensorConfig {
    pub fn from_env() -> Self {
        Self {
            collection: env::var("SENSOR_COLLECTION").unwrap_or_else(|_| "hc-05".to_string()),
            device_id: env::var("SENSOR_DEVICE_ID")
                .unwrap_or_else(|_| "00-23-05-00-40-74".to_string()),
        }
    }

    /// Collection path holding the individual readings.
    pub fn readings_path(&self) -> String {
        format!("{}/{}/readings", self.collection, self.device_id)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            collection: "hc-05".to_string(),
            device_id: "00-23-05-00-40-74".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_path() {
        let config = SensorConfig::default();
        assert_eq!(config.readings_path(), "hc-05/00-23-05-00-40-74/readings");
    }
}
