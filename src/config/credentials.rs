//! Credential resolution for the backing identity and document services.
//!
//! Credentials are resolved exactly once at process start, in this order:
//!
//! 1. `SERVICE_ACCOUNT_JSON` — inline JSON in the environment
//! 2. `SERVICE_ACCOUNT_FILE` — path to a key file (default
//!    `serviceAccountKey.json`, development only)
//! 3. `GOOGLE_CLOUD_PROJECT` — ambient platform credentials on managed
//!    deployments, where no key material is shipped with the process
//!
//! The API key used by the identity service's public endpoints comes from
//! `IDENTITY_API_KEY`; an optional bearer token for the document store can be
//! injected via `STORE_ACCESS_TOKEN` (a platform proxy or metadata service
//! normally provides this in production).

use std::env;
use std::fs;

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::info;

#[derive(Clone, Debug)]
pub struct ServiceCredentials {
    pub project_id: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    project_id: String,
}

impl ServiceCredentials {
    pub fn load() -> anyhow::Result<Self> {
        let api_key = env::var("IDENTITY_API_KEY").unwrap_or_else(|_| "demo-api-key".to_string());
        let access_token = env::var("STORE_ACCESS_TOKEN").ok();

        if let Ok(json) = env::var("SERVICE_ACCOUNT_JSON") {
            let key: ServiceAccountKey =
                serde_json::from_str(&json).context("SERVICE_ACCOUNT_JSON inválido")?;
            info!("Usando SERVICE_ACCOUNT_JSON (env)");
            return Ok(Self {
                project_id: key.project_id,
                api_key,
                access_token,
            });
        }

        let key_path =
            env::var("SERVICE_ACCOUNT_FILE").unwrap_or_else(|_| "serviceAccountKey.json".into());
        if let Ok(contents) = fs::read_to_string(&key_path) {
            let key: ServiceAccountKey = serde_json::from_str(&contents)
                .with_context(|| format!("archivo de credenciales inválido: {key_path}"))?;
            info!(path = %key_path, "Usando archivo de credenciales (local)");
            return Ok(Self {
                project_id: key.project_id,
                api_key,
                access_token,
            });
        }

        if let Ok(project_id) = env::var("GOOGLE_CLOUD_PROJECT") {
            info!("Usando credenciales de plataforma (managed)");
            return Ok(Self {
                project_id,
                api_key,
                access_token,
            });
        }

        bail!(
            "no se encontraron credenciales: define SERVICE_ACCOUNT_JSON, \
             SERVICE_ACCOUNT_FILE o GOOGLE_CLOUD_PROJECT"
        )
    }

    /// Fixed credentials for the in-process backends used in development and
    /// tests, where no external service is contacted.
    pub fn in_process() -> Self {
        Self {
            project_id: "brotes-dev".to_string(),
            api_key: "demo-api-key".to_string(),
            access_token: None,
        }
    }
}
