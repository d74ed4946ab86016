//! In-process identity backend.
//!
//! Keeps accounts in memory with bcrypt password hashes and mints HS256
//! session tokens. Selected with `IDENTITY_BACKEND=memory`; used for local
//! development and the integration tests, which also use its failure hooks
//! (call counting, session revocation).

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{IdentityError, IdentityRecord, IdentityService, PasswordGrant, SessionClaims};

#[derive(Clone)]
struct Account {
    uid: String,
    email: String,
    password_hash: String,
    role: Option<String>,
}

pub struct MemoryIdentityService {
    session_secret: String,
    accounts: RwLock<HashMap<String, Account>>,
    revoked: RwLock<HashSet<String>>,
    password_checks: AtomicUsize,
}

impl MemoryIdentityService {
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            session_secret: session_secret.into(),
            accounts: RwLock::new(HashMap::new()),
            revoked: RwLock::new(HashSet::new()),
            password_checks: AtomicUsize::new(0),
        }
    }

    /// Number of password verifications performed. The login throttle tests
    /// assert a locked email never reaches this far.
    pub fn password_checks(&self) -> usize {
        self.password_checks.load(Ordering::SeqCst)
    }

    /// Revoke all sessions of an account, as the real provider can do
    /// independently of this application.
    pub fn revoke_sessions(&self, uid: &str) {
        self.revoked.write().unwrap().insert(uid.to_string());
    }

    fn find_by_uid(&self, uid: &str) -> Option<Account> {
        self.accounts
            .read()
            .unwrap()
            .values()
            .find(|account| account.uid == uid)
            .cloned()
    }
}

#[async_trait]
impl IdentityService for MemoryIdentityService {
    async fn create_user(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(IdentityError::Rejected("EMAIL_EXISTS".to_string()));
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|err| IdentityError::Unexpected(err.to_string()))?;
        let uid = Uuid::new_v4().simple().to_string();

        accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                email: email.to_string(),
                password_hash,
                role: None,
            },
        );

        Ok(uid)
    }

    async fn set_role_claim(&self, uid: &str, role: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .values_mut()
            .find(|account| account.uid == uid)
            .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))?;
        account.role = Some(role.to_string());
        Ok(())
    }

    async fn verify_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PasswordGrant, IdentityError> {
        self.password_checks.fetch_add(1, Ordering::SeqCst);

        let account = self
            .accounts
            .read()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(|| IdentityError::Rejected("EMAIL_NOT_FOUND".to_string()))?;

        let matches = verify(password, &account.password_hash)
            .map_err(|err| IdentityError::Unexpected(err.to_string()))?;
        if !matches {
            return Err(IdentityError::Rejected("INVALID_PASSWORD".to_string()));
        }

        Ok(PasswordGrant {
            uid: account.uid.clone(),
            token: account.uid,
        })
    }

    async fn create_session_token(
        &self,
        grant: &PasswordGrant,
        ttl_seconds: i64,
    ) -> Result<String, IdentityError> {
        let account = self
            .find_by_uid(&grant.uid)
            .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))?;

        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: account.uid,
            role: account.role,
            exp: now + ttl_seconds,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.session_secret.as_bytes()),
        )
        .map_err(|err| IdentityError::Unexpected(err.to_string()))
    }

    async fn verify_session_token(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, IdentityError> {
        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.session_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| IdentityError::InvalidSession)?;

        if check_revoked {
            if self.revoked.read().unwrap().contains(&claims.sub) {
                return Err(IdentityError::InvalidSession);
            }
            if self.find_by_uid(&claims.sub).is_none() {
                return Err(IdentityError::InvalidSession);
            }
        }

        Ok(claims)
    }

    async fn list_users(&self) -> Result<Vec<IdentityRecord>, IdentityError> {
        let accounts = self.accounts.read().unwrap();
        let mut records: Vec<IdentityRecord> = accounts
            .values()
            .map(|account| IdentityRecord {
                uid: account.uid.clone(),
                email: account.email.clone(),
                role: account.role.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MemoryIdentityService {
        MemoryIdentityService::new("test-secret")
    }

    #[tokio::test]
    async fn test_create_and_verify_password() {
        let identity = service();
        let uid = identity.create_user("a@x.com", "Abcdef1!").await.unwrap();

        let grant = identity.verify_password("a@x.com", "Abcdef1!").await.unwrap();
        assert_eq!(grant.uid, uid);

        let err = identity.verify_password("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(ref code) if code == "INVALID_PASSWORD"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let identity = service();
        identity.create_user("a@x.com", "Abcdef1!").await.unwrap();
        let err = identity.create_user("a@x.com", "Abcdef1!").await.unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(ref code) if code == "EMAIL_EXISTS"));
    }

    #[tokio::test]
    async fn test_session_round_trip_carries_role() {
        let identity = service();
        let uid = identity.create_user("a@x.com", "Abcdef1!").await.unwrap();
        identity.set_role_claim(&uid, "maestro").await.unwrap();

        let grant = identity.verify_password("a@x.com", "Abcdef1!").await.unwrap();
        let token = identity.create_session_token(&grant, 3600).await.unwrap();
        let claims = identity.verify_session_token(&token, true).await.unwrap();

        assert_eq!(claims.sub, uid);
        assert_eq!(claims.role.as_deref(), Some("maestro"));
    }

    #[tokio::test]
    async fn test_revoked_session_rejected() {
        let identity = service();
        let uid = identity.create_user("a@x.com", "Abcdef1!").await.unwrap();
        let grant = identity.verify_password("a@x.com", "Abcdef1!").await.unwrap();
        let token = identity.create_session_token(&grant, 3600).await.unwrap();

        identity.revoke_sessions(&uid);
        let err = identity.verify_session_token(&token, true).await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidSession));
    }

    #[tokio::test]
    async fn test_password_checks_counter() {
        let identity = service();
        identity.create_user("a@x.com", "Abcdef1!").await.unwrap();
        assert_eq!(identity.password_checks(), 0);
        let _ = identity.verify_password("a@x.com", "nope").await;
        assert_eq!(identity.password_checks(), 1);
    }
}
