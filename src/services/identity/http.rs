//! Identity-toolkit REST adapter.
//!
//! Speaks the `identitytoolkit` v1 contract: public endpoints are keyed by
//! the project API key, project-scoped admin endpoints live under
//! `projects/{project_id}`. The emulator exposes the same surface, so
//! development deployments only need `IDENTITY_BASE_URL` pointed at it.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use serde_json::json;

use crate::config::credentials::ServiceCredentials;
use crate::config::identity::IdentityConfig;

use super::{IdentityError, IdentityRecord, IdentityService, PasswordGrant, SessionClaims};

pub struct HttpIdentityService {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionCookieResponse {
    session_cookie: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AccountsResponse {
    #[serde(default)]
    users: Vec<AccountInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    /// JSON-encoded custom claims, e.g. `{"role":"maestro"}`.
    #[serde(default)]
    custom_attributes: Option<String>,
    /// Seconds-since-epoch watermark; tokens issued before it are revoked.
    #[serde(default)]
    valid_since: Option<String>,
}

impl AccountInfo {
    fn role(&self) -> Option<String> {
        let attrs = self.custom_attributes.as_deref()?;
        let value: serde_json::Value = serde_json::from_str(attrs).ok()?;
        value.get("role")?.as_str().map(str::to_string)
    }
}

impl HttpIdentityService {
    pub fn new(config: &IdentityConfig, credentials: &ServiceCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: credentials.project_id.clone(),
            api_key: credentials.api_key.clone(),
        }
    }

    fn account_url(&self, action: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.base_url, action, self.api_key
        )
    }

    fn project_url(&self, suffix: &str) -> String {
        format!(
            "{}/projects/{}{}?key={}",
            self.base_url, self.project_id, suffix, self.api_key
        )
    }

    /// Upstream rejections arrive as `{"error": {"message": "CODE"}}`.
    async fn rejection(resp: reqwest::Response) -> IdentityError {
        let status = resp.status();
        match resp.json::<ErrorEnvelope>().await {
            Ok(envelope) => IdentityError::Rejected(envelope.error.message),
            Err(_) => IdentityError::Unexpected(format!("upstream status {status}")),
        }
    }

    /// Decode the claims of a token the provider has already validated via
    /// `accounts:lookup`. Signature and expiry checks happened upstream.
    fn decode_validated_claims(token: &str) -> Result<SessionClaims, IdentityError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| IdentityError::InvalidSession)
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let resp = self
            .http
            .post(self.account_url("signUp"))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let body: SignUpResponse = resp.json().await?;
        Ok(body.local_id)
    }

    async fn set_role_claim(&self, uid: &str, role: &str) -> Result<(), IdentityError> {
        let attributes = json!({ "role": role }).to_string();
        let resp = self
            .http
            .post(self.project_url("/accounts:update"))
            .json(&json!({
                "localId": uid,
                "customAttributes": attributes,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        Ok(())
    }

    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordGrant, IdentityError> {
        let resp = self
            .http
            .post(self.account_url("signInWithPassword"))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let body: SignInResponse = resp.json().await?;
        Ok(PasswordGrant {
            uid: body.local_id,
            token: body.id_token,
        })
    }

    async fn create_session_token(
        &self,
        grant: &PasswordGrant,
        ttl_seconds: i64,
    ) -> Result<String, IdentityError> {
        let resp = self
            .http
            .post(self.project_url(":createSessionCookie"))
            .json(&json!({
                "idToken": grant.token,
                "validDuration": ttl_seconds.to_string(),
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let body: SessionCookieResponse = resp.json().await?;
        Ok(body.session_cookie)
    }

    async fn verify_session_token(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, IdentityError> {
        let resp = self
            .http
            .post(self.account_url("lookup"))
            .json(&json!({ "idToken": token }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(IdentityError::InvalidSession);
        }

        let body: AccountsResponse = resp.json().await?;
        let account = body.users.into_iter().next().ok_or(IdentityError::InvalidSession)?;

        let mut claims = Self::decode_validated_claims(token)?;
        // The lookup is authoritative for the uid and the current claim set.
        claims.sub = account.local_id.clone();
        if claims.role.is_none() {
            claims.role = account.role();
        }

        if check_revoked {
            let valid_since = account
                .valid_since
                .as_deref()
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(0);
            if claims.iat < valid_since {
                return Err(IdentityError::InvalidSession);
            }
        }

        Ok(claims)
    }

    async fn list_users(&self) -> Result<Vec<IdentityRecord>, IdentityError> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/projects/{}/accounts:batchGet?key={}&maxResults=500",
                self.base_url, self.project_id, self.api_key
            );
            if let Some(token) = &page_token {
                url.push_str("&nextPageToken=");
                url.push_str(token);
            }

            let resp = self.http.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(Self::rejection(resp).await);
            }

            let body: AccountsResponse = resp.json().await?;
            for account in &body.users {
                records.push(IdentityRecord {
                    uid: account.local_id.clone(),
                    email: account.email.clone().unwrap_or_default(),
                    role: account.role(),
                });
            }

            match body.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_role_from_custom_attributes() {
        let account = AccountInfo {
            local_id: "u1".to_string(),
            email: Some("a@x.com".to_string()),
            custom_attributes: Some(r#"{"role":"maestro"}"#.to_string()),
            valid_since: None,
        };
        assert_eq!(account.role().as_deref(), Some("maestro"));
    }

    #[test]
    fn test_account_role_absent() {
        let account = AccountInfo {
            local_id: "u1".to_string(),
            email: None,
            custom_attributes: None,
            valid_since: None,
        };
        assert_eq!(account.role(), None);
    }

    #[test]
    fn test_error_envelope_parses() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#).unwrap();
        assert_eq!(envelope.error.message, "INVALID_PASSWORD");
    }
}
