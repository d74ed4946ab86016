use std::env;
use std::fmt;
use std::sync::Arc;

use crate::config::cors::CorsConfig;
use crate::config::credentials::ServiceCredentials;
use crate::config::identity::{IdentityBackend, IdentityConfig};
use crate::config::rate_limit::RateLimitConfig;
use crate::config::sensor::SensorConfig;
use crate::config::session::SessionConfig;
use crate::config::store::{StoreBackend, StoreConfig};
use crate::services::identity::{HttpIdentityService, IdentityService, MemoryIdentityService};
use crate::services::store::{DocumentStore, FirestoreStore, MemoryDocumentStore};

/// Shared application state. The service adapters are constructed exactly
/// once here and injected everywhere else; no component reaches for a
/// process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    pub store: Arc<dyn DocumentStore>,
    pub session_config: SessionConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub sensor_config: SensorConfig,
    /// Shared secret required to register `admin` accounts. With no secret
    /// configured, admin registration is always refused.
    pub admin_secret: Option<String>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("session_config", &self.session_config)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("sensor_config", &self.sensor_config)
            .finish_non_exhaustive()
    }
}

pub fn init_app_state() -> anyhow::Result<AppState> {
    let identity_config = IdentityConfig::from_env();
    let store_config = StoreConfig::from_env();

    let in_process = identity_config.backend == IdentityBackend::Memory
        && store_config.backend == StoreBackend::Memory;
    let credentials = if in_process {
        ServiceCredentials::in_process()
    } else {
        ServiceCredentials::load()?
    };

    let identity: Arc<dyn IdentityService> = match identity_config.backend {
        IdentityBackend::Http => Arc::new(HttpIdentityService::new(&identity_config, &credentials)),
        IdentityBackend::Memory => {
            Arc::new(MemoryIdentityService::new(&identity_config.session_secret))
        }
    };

    let store: Arc<dyn DocumentStore> = match store_config.backend {
        StoreBackend::Firestore => Arc::new(FirestoreStore::new(&store_config, &credentials)),
        StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
    };

    Ok(AppState {
        identity,
        store,
        session_config: SessionConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        sensor_config: SensorConfig::from_env(),
        admin_secret: env::var("ADMIN_SECRET").ok(),
    })
}
