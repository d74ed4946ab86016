use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

/// Rate limit configuration for the registration endpoint.
///
/// Registration is limited per source IP as a coarse anti-abuse measure,
/// independent of the per-email login throttle. The key extractor prefers
/// forwarded-for headers so limits hold behind the platform proxy.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Registrations allowed per hour per IP
    pub register_per_hour: u64,
    /// Burst size for the registration limiter
    pub register_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            register_per_hour: 5,
            register_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            register_per_hour: std::env::var("RATE_LIMIT_REGISTER_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            register_burst_size: std::env::var("RATE_LIMIT_REGISTER_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Create the GovernorConfig for the registration endpoint.
    pub fn register_governor_config(
        &self,
    ) -> GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        let replenish_seconds = (3600 / self.register_per_hour.max(1)).max(1);

        GovernorConfigBuilder::default()
            .per_second(replenish_seconds)
            .burst_size(self.register_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("Failed to build register rate limiter config")
    }
}
