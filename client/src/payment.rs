#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use grid_shared::{CreatePaymentIntentRequest, CreatePaymentIntentResponse, dollars_to_cents};

/// Stripe test-mode publishable key; safe to embed client-side.
const STRIPE_PUBLISHABLE_KEY: &str =
    "pk_test_51QC1J9FVgYB0mg1hxlsoSj4qia6f8dH1SjcS2jGbv9DFTu5VGL1i9uZpLnFvR41qvHDdgYOGYY8gPom8hcqF4Ebw00x3nA0BMt";

/// Charge `amount_dollars` for a square. Creates a payment intent through
/// our server proxy, then confirms it with Stripe.js loaded from the page.
/// Returns `true` only when Stripe reports the intent as succeeded.
pub async fn process_payment(amount_dollars: f64, payment_method_id: &str, square_id: &str) -> bool {
    let client_secret = match create_payment_intent(amount_dollars, payment_method_id, square_id).await
    {
        Ok(secret) => secret,
        Err(err) => {
            web_sys::console::error_1(&format!("payment intent failed: {err}").into());
            return false;
        }
    };

    match confirm_card_payment(&client_secret, payment_method_id).await {
        Ok(succeeded) => succeeded,
        Err(err) => {
            web_sys::console::error_1(&err);
            false
        }
    }
}

async fn create_payment_intent(
    amount_dollars: f64,
    payment_method_id: &str,
    square_id: &str,
) -> Result<String, String> {
    let request = CreatePaymentIntentRequest {
        amount: dollars_to_cents(amount_dollars),
        payment_method_id: payment_method_id.to_string(),
        square_id: Some(square_id.to_string()),
    };

    let resp = gloo_net::http::Request::post("/api/create-payment-intent")
        .json(&request)
        .map_err(|e| format!("encode error: {e}"))?
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    let body = resp
        .json::<CreatePaymentIntentResponse>()
        .await
        .map_err(|e| format!("parse error: {e}"))?;
    Ok(body.client_secret)
}

/// Drive `Stripe(pk).confirmCardPayment(secret, {payment_method})` through
/// the global Stripe.js object included by index.html.
async fn confirm_card_payment(client_secret: &str, payment_method_id: &str) -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let stripe_ctor = Reflect::get(window.as_ref(), &JsValue::from_str("Stripe"))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str("Stripe.js is not loaded"))?;
    let stripe = stripe_ctor.call1(
        &JsValue::NULL,
        &JsValue::from_str(STRIPE_PUBLISHABLE_KEY),
    )?;

    let confirm = Reflect::get(&stripe, &JsValue::from_str("confirmCardPayment"))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str("confirmCardPayment is unavailable"))?;

    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("payment_method"),
        &JsValue::from_str(payment_method_id),
    )?;

    let promise: Promise = confirm
        .call2(&stripe, &JsValue::from_str(client_secret), &options)?
        .dyn_into()?;
    let result = JsFuture::from(promise).await?;

    let error = Reflect::get(&result, &JsValue::from_str("error"))?;
    if !error.is_undefined() && !error.is_null() {
        web_sys::console::error_1(&error);
        return Ok(false);
    }

    let status = Reflect::get(&result, &JsValue::from_str("paymentIntent"))
        .and_then(|intent| Reflect::get(&intent, &JsValue::from_str("status")))?
        .as_string();
    Ok(status.as_deref() == Some("succeeded"))
}
