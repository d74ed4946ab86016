//! Per-email login throttle.
//!
//! Counter document per email address: `attempts` plus `lastAttempt`.
//! Five failed attempts lock the email for five minutes, measured from the
//! most recent failure — the window slides and re-arms on every additional
//! failure while locked. A locked email is rejected before the identity
//! service is contacted at all.
//!
//! The counter is a best-effort read-modify-write without preconditions, so
//! concurrent failures for one email can under-count. That matches the
//! deployed behavior and is deliberately left as is.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::instrument;

use crate::services::store::{DocumentStore, Fields, collections};
use crate::utils::errors::AppError;

/// Failures at which the lockout engages.
pub const MAX_FAILED_ATTEMPTS: i64 = 5;

/// Lockout window, measured from the last failed attempt.
pub fn lockout_window() -> Duration {
    Duration::minutes(5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// No failures on record.
    Clear,
    /// Some failures, below the lockout threshold.
    Accumulating(i64),
    /// At or past the threshold, inside the window.
    Locked,
}

/// Derive the throttle state from the stored counter.
///
/// An elapsed window reads as `Clear`: the next attempt proceeds with a
/// fresh count.
pub fn evaluate(
    attempts: i64,
    last_attempt: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ThrottleState {
    if attempts >= MAX_FAILED_ATTEMPTS {
        if let Some(last) = last_attempt {
            return if now - last < lockout_window() {
                ThrottleState::Locked
            } else {
                ThrottleState::Clear
            };
        }
    }

    if attempts <= 0 {
        ThrottleState::Clear
    } else {
        ThrottleState::Accumulating(attempts)
    }
}

pub struct LoginThrottle<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> LoginThrottle<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Gate a login attempt. Returns the failure count a subsequent failure
    /// builds on (zero once the window has elapsed), or rejects while locked.
    #[instrument(skip(self))]
    pub async fn check(&self, email: &str) -> Result<i64, AppError> {
        let doc = self.store.get(collections::LOGIN_ATTEMPTS, email).await?;

        let attempts = counter_attempts(doc.as_ref());
        let last_attempt = counter_last_attempt(doc.as_ref());

        match evaluate(attempts, last_attempt, Utc::now()) {
            ThrottleState::Locked => Err(AppError::rate_limited(
                "Demasiados intentos. Intenta en 5 minutos.",
            )),
            ThrottleState::Clear => Ok(0),
            ThrottleState::Accumulating(attempts) => Ok(attempts),
        }
    }

    /// Record a failed password check on top of `prior_attempts`.
    #[instrument(skip(self))]
    pub async fn record_failure(&self, email: &str, prior_attempts: i64) -> Result<(), AppError> {
        let fields: Fields = json!({
            "attempts": prior_attempts + 1,
            "lastAttempt": Utc::now().to_rfc3339(),
        })
        .as_object()
        .cloned()
        .unwrap_or_default();

        self.store
            .merge(collections::LOGIN_ATTEMPTS, email, fields)
            .await?;
        Ok(())
    }

    /// Reset the counter after a successful password check.
    #[instrument(skip(self))]
    pub async fn record_success(&self, email: &str) -> Result<(), AppError> {
        let fields: Fields = json!({ "attempts": 0 })
            .as_object()
            .cloned()
            .unwrap_or_default();

        self.store
            .merge(collections::LOGIN_ATTEMPTS, email, fields)
            .await?;
        Ok(())
    }
}

fn counter_attempts(doc: Option<&Fields>) -> i64 {
    doc.and_then(|fields| fields.get("attempts"))
        .and_then(|value| value.as_i64())
        .unwrap_or(0)
}

fn counter_last_attempt(doc: Option<&Fields>) -> Option<DateTime<Utc>> {
    doc.and_then(|fields| fields.get("lastAttempt"))
        .and_then(|value| value.as_str())
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
