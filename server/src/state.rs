use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::config::{upstream_connect_timeout, upstream_http_timeout};

#[derive(Clone)]
pub struct AppState {
    pub http_client: reqwest::Client,
    pub stripe: Arc<StripeConfig>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    /// API origin without trailing slash, e.g. `https://api.stripe.com`.
    pub api_base: String,
}

impl StripeConfig {
    pub fn payment_intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base)
    }
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    payment_intent_requests_total: AtomicU64,
    payment_intent_rejected_total: AtomicU64,
    stripe_upstream_errors_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub payment_intent_requests_total: u64,
    pub payment_intent_rejected_total: u64,
    pub stripe_upstream_errors_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            payment_intent_requests_total: self
                .payment_intent_requests_total
                .load(Ordering::Relaxed),
            payment_intent_rejected_total: self
                .payment_intent_rejected_total
                .load(Ordering::Relaxed),
            stripe_upstream_errors_total: self.stripe_upstream_errors_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_payment_intent_request(&self) {
        self.payment_intent_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_payment_intent_rejected(&self) {
        self.payment_intent_rejected_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stripe_upstream_error(&self) {
        self.stripe_upstream_errors_total
            .fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(stripe_secret: String, stripe_api_base: String) -> Self {
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("the-grid/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, retrying without custom user-agent"
                );
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .build()
            })
            .unwrap_or_else(|e| {
                panic!("failed to build timeout-configured HTTP client: {e}");
            });
        Self {
            http_client,
            stripe: Arc::new(StripeConfig {
                secret_key: stripe_secret,
                api_base: stripe_api_base,
            }),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
