use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use grid_shared::{CreatePaymentIntentRequest, CreatePaymentIntentResponse};

use crate::config::MAX_PAYMENT_AMOUNT_CENTS;
use crate::state::AppState;

/// Subset of the Stripe payment-intent object we care about.
#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    client_secret: Option<String>,
}

/// Create a payment intent with the card processor and hand the client
/// secret back to the browser, which confirms the payment itself.
/// One unguarded upstream attempt; failures map to 502.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>, StatusCode> {
    state.observability.record_payment_intent_request();

    if let Err(reason) = validate_amount(request.amount) {
        state.observability.record_payment_intent_rejected();
        tracing::warn!(amount = request.amount, reason, "rejected payment intent");
        return Err(StatusCode::BAD_REQUEST);
    }

    let square_id = request.square_id.as_deref().unwrap_or("");
    let form: Vec<(&str, String)> = vec![
        ("amount", request.amount.to_string()),
        ("currency", "usd".to_owned()),
        ("metadata[squareId]", square_id.to_owned()),
    ];

    let response = state
        .http_client
        .post(state.stripe.payment_intents_url())
        .bearer_auth(&state.stripe.secret_key)
        .form(&form)
        .send()
        .await
        .map_err(|e| {
            state.observability.record_stripe_upstream_error();
            tracing::error!(error = %e, "payment intent request failed");
            StatusCode::BAD_GATEWAY
        })?;

    if !response.status().is_success() {
        state.observability.record_stripe_upstream_error();
        tracing::error!(status = %response.status(), "card processor rejected payment intent");
        return Err(StatusCode::BAD_GATEWAY);
    }

    let intent: StripePaymentIntent = response.json().await.map_err(|e| {
        state.observability.record_stripe_upstream_error();
        tracing::error!(error = %e, "unparseable payment intent response");
        StatusCode::BAD_GATEWAY
    })?;

    let Some(client_secret) = intent.client_secret else {
        state.observability.record_stripe_upstream_error();
        tracing::error!("payment intent response had no client secret");
        return Err(StatusCode::BAD_GATEWAY);
    };

    Ok(Json(CreatePaymentIntentResponse { client_secret }))
}

fn validate_amount(amount: i64) -> Result<(), &'static str> {
    if amount <= 0 {
        return Err("amount must be positive");
    }
    if amount > MAX_PAYMENT_AMOUNT_CENTS {
        return Err("amount exceeds maximum");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{Json as AxumJson, Router, routing::post};

    use super::validate_amount;
    use crate::state::AppState;
    use grid_shared::{CreatePaymentIntentRequest, CreatePaymentIntentResponse};

    #[test]
    fn validate_amount_bounds() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(9_900).is_ok());
        assert!(validate_amount(super::MAX_PAYMENT_AMOUNT_CENTS).is_ok());
        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-500).is_err());
        assert!(validate_amount(super::MAX_PAYMENT_AMOUNT_CENTS + 1).is_err());
    }

    async fn spawn_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    async fn spawn_app(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        spawn_server(crate::app::build_app(state)).await
    }

    /// Minimal stand-in for the card processor's payment-intent endpoint.
    fn mock_stripe_ok() -> Router {
        Router::new().route(
            "/v1/payment_intents",
            post(|| async {
                AxumJson(serde_json::json!({
                    "id": "pi_test_1",
                    "client_secret": "pi_test_1_secret_abc",
                    "status": "requires_confirmation"
                }))
            }),
        )
    }

    fn mock_stripe_failing() -> Router {
        Router::new().route(
            "/v1/payment_intents",
            post(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream exploded",
                )
            }),
        )
    }

    #[tokio::test]
    async fn create_payment_intent_happy_path_with_mock_processor() {
        let (stripe_addr, stripe_handle) = spawn_server(mock_stripe_ok()).await;
        let state = AppState::new("sk_test_local".into(), format!("http://{stripe_addr}"));
        let (addr, server_handle) = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/create-payment-intent"))
            .json(&CreatePaymentIntentRequest {
                amount: 9_900,
                payment_method_id: "pm_card_visa".into(),
                square_id: Some("0,0".into()),
            })
            .send()
            .await
            .expect("payment intent request")
            .error_for_status()
            .expect("payment intent status")
            .json::<CreatePaymentIntentResponse>()
            .await
            .expect("parse payment intent response");

        assert_eq!(response.client_secret, "pi_test_1_secret_abc");

        server_handle.abort();
        stripe_handle.abort();
    }

    #[tokio::test]
    async fn create_payment_intent_rejects_non_positive_amount() {
        let state = AppState::new("sk_test_local".into(), "http://127.0.0.1:1".into());
        let (addr, server_handle) = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/create-payment-intent"))
            .json(&CreatePaymentIntentRequest {
                amount: 0,
                payment_method_id: "pm_card_visa".into(),
                square_id: None,
            })
            .send()
            .await
            .expect("payment intent request");

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        server_handle.abort();
    }

    #[tokio::test]
    async fn create_payment_intent_maps_upstream_failure_to_bad_gateway() {
        let (stripe_addr, stripe_handle) = spawn_server(mock_stripe_failing()).await;
        let state = AppState::new("sk_test_local".into(), format!("http://{stripe_addr}"));
        let (addr, server_handle) = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/create-payment-intent"))
            .json(&CreatePaymentIntentRequest {
                amount: 5_450,
                payment_method_id: "pm_card_visa".into(),
                square_id: Some("3,-4".into()),
            })
            .send()
            .await
            .expect("payment intent request");

        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);

        server_handle.abort();
        stripe_handle.abort();
    }
}
