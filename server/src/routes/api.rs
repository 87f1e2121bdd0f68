use std::fmt::Write as _;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "observability": {
            "payment_intent_requests_total": observability.payment_intent_requests_total,
            "payment_intent_rejected_total": observability.payment_intent_rejected_total,
            "stripe_upstream_errors_total": observability.stripe_upstream_errors_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = render_prometheus_metrics(state.observability.snapshot());

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP grid_payment_intent_requests_total Total payment-intent API requests."
    );
    let _ = writeln!(body, "# TYPE grid_payment_intent_requests_total counter");
    let _ = writeln!(
        body,
        "grid_payment_intent_requests_total {}",
        observability.payment_intent_requests_total
    );

    let _ = writeln!(
        body,
        "# HELP grid_payment_intent_rejected_total Total payment-intent requests rejected by validation."
    );
    let _ = writeln!(body, "# TYPE grid_payment_intent_rejected_total counter");
    let _ = writeln!(
        body,
        "grid_payment_intent_rejected_total {}",
        observability.payment_intent_rejected_total
    );

    let _ = writeln!(
        body,
        "# HELP grid_stripe_upstream_errors_total Total failures talking to the card processor."
    );
    let _ = writeln!(body, "# TYPE grid_stripe_upstream_errors_total counter");
    let _ = writeln!(
        body,
        "grid_stripe_upstream_errors_total {}",
        observability.stripe_upstream_errors_total
    );

    body
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::render_prometheus_metrics;
    use crate::state::{AppState, ObservabilitySnapshot};

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    #[test]
    fn metrics_output_contains_prometheus_help_type_and_values() {
        let metrics = render_prometheus_metrics(ObservabilitySnapshot {
            payment_intent_requests_total: 12,
            payment_intent_rejected_total: 3,
            stripe_upstream_errors_total: 7,
        });

        assert!(metrics.contains("# HELP grid_payment_intent_requests_total"));
        assert!(metrics.contains("# TYPE grid_payment_intent_requests_total counter"));
        assert!(metrics.contains("grid_payment_intent_requests_total 12"));
        assert!(metrics.contains("grid_payment_intent_rejected_total 3"));
        assert!(metrics.contains("grid_stripe_upstream_errors_total 7"));
    }

    #[tokio::test]
    async fn health_and_metrics_expose_expected_contract() {
        let state = AppState::new("sk_test_local".into(), "http://127.0.0.1:1".into());
        let (addr, server_handle) = spawn_test_server(state).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        let health = client
            .get(format!("{base_url}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert!(
            health
                .get("observability")
                .and_then(|v| v.get("payment_intent_requests_total"))
                .and_then(|v| v.as_u64())
                .is_some()
        );

        let metrics = client
            .get(format!("{base_url}/api/metrics"))
            .send()
            .await
            .expect("metrics request")
            .error_for_status()
            .expect("metrics status")
            .text()
            .await
            .expect("parse metrics text");

        assert!(metrics.contains("# TYPE grid_payment_intent_requests_total counter"));
        assert!(metrics.contains("grid_payment_intent_requests_total 0"));

        server_handle.abort();
        let _ = server_handle.await;
    }
}
