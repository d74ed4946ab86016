use std::env;

/// Which identity backend to construct at startup.
///
/// `Http` talks to an identity-toolkit compatible REST endpoint; `Memory`
/// keeps accounts in-process and is meant for development and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityBackend {
    Http,
    Memory,
}

#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub backend: IdentityBackend,
    pub base_url: String,
    /// Signing secret for session tokens minted by the in-process backend.
    pub session_secret: String,
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        let backend = match env::var("IDENTITY_BACKEND").as_deref() {
            Ok("memory") => IdentityBackend::Memory,
            _ => IdentityBackend::Http,
        };

        Self {
            backend,
            base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "dev-session-secret-change-in-production".to_string()),
        }
    }
}
