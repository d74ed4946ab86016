use anyhow::anyhow;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, instrument, warn};

use crate::config::session::SESSION_TTL_SECONDS;
use crate::middleware::auth::SessionUser;
use crate::modules::users::model::Role;
use crate::services::identity::{IdentityError, IdentityService as _};
use crate::services::store::{DocumentStore as _, Fields, collections};
use crate::state::AppState;
use crate::utils::errors::AppError;

use super::model::{LoginRequest, RegisterRequest};
use super::throttle::LoginThrottle;

pub struct AuthService;

impl AuthService {
    /// Create the identity, set its role claim, then create the UserProfile
    /// document. The two writes are not atomic: a crash after the identity
    /// exists but before the profile write leaves an orphaned identity. The
    /// `repair-profiles` job recreates missing profiles explicitly.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn register(state: &AppState, dto: RegisterRequest) -> Result<String, AppError> {
        let role = dto.role.unwrap_or(Role::Estudiante);

        if role == Role::Admin {
            let authorized = match (dto.admin_secret.as_deref(), state.admin_secret.as_deref()) {
                (Some(provided), Some(expected)) => provided == expected,
                _ => false,
            };
            if !authorized {
                return Err(AppError::forbidden("Admin secret requerido o incorrecto"));
            }
        }

        let uid = state
            .identity
            .create_user(&dto.email, &dto.password)
            .await
            .map_err(register_error)?;

        state
            .identity
            .set_role_claim(&uid, role.as_str())
            .await
            .map_err(register_error)?;

        let profile: Fields = json!({
            "email": dto.email,
            "role": role,
            "createdAt": Utc::now().to_rfc3339(),
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        state
            .store
            .set(collections::USERS, &uid, profile)
            .await
            .map_err(|err| {
                error!(uid = %uid, error = %err, "registro sin perfil: identidad huérfana");
                AppError::invalid_input("Register failed")
            })?;

        Ok(uid)
    }

    /// Throttle-gated login. The identity service is only contacted once the
    /// throttle admits the attempt; the resulting session token is handed to
    /// the controller to be set as the cookie, never returned to the client
    /// directly.
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<String, AppError> {
        let throttle = LoginThrottle::new(state.store.as_ref());
        let attempts = throttle.check(&dto.email).await?;

        let grant = match state.identity.verify_password(&dto.email, &dto.password).await {
            Ok(grant) => grant,
            Err(IdentityError::Rejected(message)) => {
                throttle.record_failure(&dto.email, attempts).await?;
                return Err(AppError::unauthenticated(message));
            }
            Err(err) => return Err(AppError::internal(err)),
        };

        throttle.record_success(&dto.email).await?;

        state
            .identity
            .create_session_token(&grant, SESSION_TTL_SECONDS)
            .await
            .map_err(AppError::internal)
    }

    /// Merge the stored profile with the resolved role. The claim wins when
    /// present; otherwise the document's role is used.
    #[instrument(skip_all, fields(uid = %user.uid()))]
    pub async fn profile(state: &AppState, user: &SessionUser) -> Result<Value, AppError> {
        let doc = state
            .store
            .get(collections::USERS, user.uid())
            .await
            .map_err(|err| {
                error!(error = %err, "/profile lookup failed");
                AppError::internal(anyhow!("Server error"))
            })?;

        let Some(mut fields) = doc else {
            return Err(AppError::not_found("No profile"));
        };

        let role = user
            .role()
            .map(str::to_string)
            .or_else(|| {
                fields
                    .get("role")
                    .and_then(|value| value.as_str())
                    .map(str::to_string)
            });

        let mut body = serde_json::Map::new();
        body.insert("uid".to_string(), json!(user.uid()));
        body.insert(
            "role".to_string(),
            role.map(Value::String).unwrap_or(Value::Null),
        );

        // Legacy profiles carry ad-hoc fields under `extraData`; they are
        // flattened into the payload.
        if let Some(Value::Object(extra)) = fields.remove("extraData") {
            for (key, value) in extra {
                body.insert(key, value);
            }
        }

        for (key, value) in fields {
            if key != "role" {
                body.insert(key, value);
            }
        }

        Ok(Value::Object(body))
    }
}

fn register_error(err: IdentityError) -> AppError {
    match err {
        IdentityError::Rejected(message) => AppError::invalid_input(message),
        other => {
            warn!(error = %other, "registro rechazado por el servicio de identidad");
            AppError::invalid_input("Register failed")
        }
    }
}
