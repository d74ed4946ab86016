use anyhow::anyhow;
use serde_json::{Value, json};
use tracing::{error, instrument};

use crate::services::store::{DocumentStore, collections};
use crate::utils::errors::AppError;

pub struct UsersService;

impl UsersService {
    /// Every UserProfile document with its id folded in.
    #[instrument(skip(store))]
    pub async fn list_users(store: &dyn DocumentStore) -> Result<Vec<Value>, AppError> {
        let documents = store.list(collections::USERS).await.map_err(|err| {
            error!(error = %err, "GET /users failed");
            AppError::internal(anyhow!("Server error"))
        })?;

        Ok(documents
            .into_iter()
            .map(|doc| {
                let mut fields = doc.fields;
                fields.insert("id".to_string(), json!(doc.id));
                Value::Object(fields)
            })
            .collect())
    }

    /// Update the visible name of an existing profile. A missing profile is
    /// an upstream precondition failure, surfaced like any other store error.
    #[instrument(skip(store))]
    pub async fn update_display_name(
        store: &dyn DocumentStore,
        uid: &str,
        display_name: &str,
    ) -> Result<(), AppError> {
        let fields = json!({ "displayName": display_name })
            .as_object()
            .cloned()
            .unwrap_or_default();

        store
            .update(collections::USERS, uid, fields)
            .await
            .map_err(|err| {
                error!(uid = %uid, error = %err, "PUT /users failed");
                AppError::internal(anyhow!("Server error"))
            })
    }
}
