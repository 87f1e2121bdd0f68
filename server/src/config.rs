use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 3001;
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Largest accepted charge, in cents ($10,000). Anything above this is a
/// malformed or hostile request, not a square purchase.
pub const MAX_PAYMENT_AMOUNT_CENTS: i64 = 1_000_000;

pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn stripe_secret_key() -> Option<String> {
    std::env::var("STRIPE_SECRET_KEY")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Stripe API origin. Overridable so tests can point at a local mock.
pub fn stripe_api_base() -> String {
    std::env::var("STRIPE_API_BASE")
        .ok()
        .map(|value| value.trim_end_matches('/').to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_owned())
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}
