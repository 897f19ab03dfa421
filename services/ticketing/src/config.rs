use std::time::Duration;

use serde::Deserialize;

use loket_core::config::Config;

use crate::usecase::retry::RetryPolicy;

/// Ticketing service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct TicketingConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HS256 signing secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server. Env var: `TICKETING_PORT`.
    #[serde(default = "default_port")]
    pub ticketing_port: u16,
    /// Access-token lifetime in seconds. Env var: `TOKEN_TTL_SECS`.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    /// Attempts per checkout before a conflict is surfaced. Env var: `CHECKOUT_MAX_ATTEMPTS`.
    #[serde(default = "default_checkout_max_attempts")]
    pub checkout_max_attempts: u32,
    /// Delay before the first checkout retry. Env var: `CHECKOUT_RETRY_BASE_MS`.
    #[serde(default = "default_checkout_retry_base_ms")]
    pub checkout_retry_base_ms: u64,
    /// Comma-separated browser origins allowed by CORS; empty allows any.
    /// Env var: `CORS_ALLOWED_ORIGINS`.
    #[serde(default)]
    pub cors_allowed_origins: String,
}

impl Config for TicketingConfig {}

impl TicketingConfig {
    pub fn checkout_retry(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.checkout_max_attempts,
            Duration::from_millis(self.checkout_retry_base_ms),
        )
    }
}

impl std::fmt::Debug for TicketingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketingConfig")
            .field("ticketing_port", &self.ticketing_port)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("checkout_max_attempts", &self.checkout_max_attempts)
            .field("checkout_retry_base_ms", &self.checkout_retry_base_ms)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

fn default_port() -> u16 {
    3000
}

fn default_token_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_checkout_max_attempts() -> u32 {
    3
}

fn default_checkout_retry_base_ms() -> u64 {
    20
}
