use std::env;

/// Session cookie lifetime: fixed five days from issuance.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60 * 24 * 5;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// `Secure` is only set on production-like deployments so local HTTP
    /// development keeps working.
    pub secure: bool,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "session".to_string()),
            secure: env::var("APP_ENV").as_deref() == Ok("production"),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            secure: false,
        }
    }
}
