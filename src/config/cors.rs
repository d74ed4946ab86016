use std::env;

/// CORS allow-list. Disabled unless `ALLOW_CORS=true`; the development
/// origins are always in the list and `PROD_ORIGIN` appends the deployed
/// frontend origin.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let mut allowed_origins = vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:8080".to_string(),
            "http://localhost:8080".to_string(),
        ];

        if let Ok(origin) = env::var("PROD_ORIGIN") {
            let origin = origin.trim();
            if !origin.is_empty() {
                allowed_origins.push(origin.to_string());
            }
        }

        Self {
            enabled: env::var("ALLOW_CORS").as_deref() == Ok("true"),
            allowed_origins,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:8080".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}
