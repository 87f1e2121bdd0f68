use serde::{Deserialize, Serialize};

/// Request body for `POST /api/create-payment-intent`.
/// Amounts are in cents; the card processor rejects fractional units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub amount: i64,
    pub payment_method_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_id: Option<String>,
}

/// Response body: the client secret used to confirm the payment in-browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// Convert a dollar price to the integer cent amount the processor expects.
pub fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_camel_case() {
        let req = CreatePaymentIntentRequest {
            amount: 9900,
            payment_method_id: "pm_123".into(),
            square_id: Some("0,0".into()),
        };
        let json = serde_json::to_value(&req).expect("serialize request");
        assert_eq!(json["amount"], 9900);
        assert_eq!(json["paymentMethodId"], "pm_123");
        assert_eq!(json["squareId"], "0,0");

        let resp: CreatePaymentIntentResponse =
            serde_json::from_str(r#"{"clientSecret":"pi_x_secret_y"}"#).expect("parse response");
        assert_eq!(resp.client_secret, "pi_x_secret_y");
    }

    #[test]
    fn dollars_to_cents_rounds_to_nearest() {
        assert_eq!(dollars_to_cents(99.0), 9900);
        assert_eq!(dollars_to_cents(54.5), 5450);
        assert_eq!(dollars_to_cents(69.33), 6933);
        // 69.335 has no exact f64 form; it sits just below the half-cent
        // boundary and rounds down.
        assert_eq!(dollars_to_cents(69.335), 6933);
    }
}
