//! Maintenance commands run from the binary's argv dispatch.
//!
//! - `create-admin` provisions an admin account directly against the backing
//!   services, bypassing the HTTP surface and its shared-secret check.
//! - `repair-profiles` is the reconciliation job for the registration saga:
//!   identity creation and profile creation are two non-atomic writes, and a
//!   crash between them leaves an identity without a profile document. This
//!   job recreates the missing documents. It never runs implicitly.

use anyhow::bail;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::modules::users::model::Role;
use crate::services::identity::IdentityService as _;
use crate::services::store::{DocumentStore as _, Fields, collections};
use crate::state::AppState;
use crate::utils::password::validate_password_strength;

fn profile_fields(email: &str, role: &str) -> Fields {
    json!({
        "email": email,
        "role": role,
        "createdAt": Utc::now().to_rfc3339(),
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Create an admin identity plus its UserProfile document.
pub async fn create_admin(state: &AppState, email: &str, password: &str) -> anyhow::Result<String> {
    if validate_password_strength(password).is_err() {
        bail!(
            "Contraseña débil. Debe tener mínimo 8 caracteres, mayúscula, minúscula, número y símbolo."
        );
    }

    let uid = state.identity.create_user(email, password).await?;
    state
        .identity
        .set_role_claim(&uid, Role::Admin.as_str())
        .await?;
    state
        .store
        .set(
            collections::USERS,
            &uid,
            profile_fields(email, Role::Admin.as_str()),
        )
        .await?;

    Ok(uid)
}

/// Recreate UserProfile documents for identities that lack one. Returns how
/// many documents were created.
pub async fn repair_profiles(state: &AppState) -> anyhow::Result<usize> {
    let mut repaired = 0;

    for record in state.identity.list_users().await? {
        if state
            .store
            .get(collections::USERS, &record.uid)
            .await?
            .is_some()
        {
            continue;
        }

        let role = record.role.as_deref().unwrap_or(Role::Estudiante.as_str());
        state
            .store
            .set(
                collections::USERS,
                &record.uid,
                profile_fields(&record.email, role),
            )
            .await?;

        info!(uid = %record.uid, email = %record.email, role = %role, "perfil recreado");
        repaired += 1;
    }

    Ok(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cors::CorsConfig;
    use crate::config::rate_limit::RateLimitConfig;
    use crate::config::sensor::SensorConfig;
    use crate::config::session::SessionConfig;
    use crate::services::identity::{IdentityService, MemoryIdentityService};
    use crate::services::store::{DocumentStore, MemoryDocumentStore};
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState {
            identity: Arc::new(MemoryIdentityService::new("test-secret")),
            store: Arc::new(MemoryDocumentStore::new()),
            session_config: SessionConfig::default(),
            cors_config: CorsConfig::default(),
            rate_limit_config: RateLimitConfig::default(),
            sensor_config: SensorConfig::default(),
            admin_secret: None,
        }
    }

    #[tokio::test]
    async fn test_create_admin_writes_identity_and_profile() {
        let state = test_state();
        let uid = create_admin(&state, "root@x.com", "Abcdef1!").await.unwrap();

        let profile = state
            .store
            .get(collections::USERS, &uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.get("role"), Some(&json!("admin")));
    }

    #[tokio::test]
    async fn test_create_admin_rejects_weak_password() {
        let state = test_state();
        assert!(create_admin(&state, "root@x.com", "abcdefgh").await.is_err());
    }

    #[tokio::test]
    async fn test_repair_profiles_recreates_missing_documents() {
        let state = test_state();

        // Orphaned identity: created with a claim but no profile document.
        let uid = state
            .identity
            .create_user("lost@x.com", "Abcdef1!")
            .await
            .unwrap();
        state.identity.set_role_claim(&uid, "maestro").await.unwrap();

        let repaired = repair_profiles(&state).await.unwrap();
        assert_eq!(repaired, 1);

        let profile = state
            .store
            .get(collections::USERS, &uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.get("email"), Some(&json!("lost@x.com")));
        assert_eq!(profile.get("role"), Some(&json!("maestro")));

        // Idempotent: nothing left to repair on a second pass.
        assert_eq!(repair_profiles(&state).await.unwrap(), 0);
    }
}
