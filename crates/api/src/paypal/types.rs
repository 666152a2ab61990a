//! Wire types for the PayPal REST payments API.
//!
//! These mirror the `/v1/payments` request/response shapes. Only the fields
//! the checkout flow touches are modelled; everything else the provider
//! returns is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// `POST /v1/oauth2/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Monetary total with currency code, two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    pub total: String,
}

impl Amount {
    /// A USD amount from a pre-formatted two-decimal total.
    #[must_use]
    pub fn usd(total: impl Into<String>) -> Self {
        Self {
            currency: "USD".to_string(),
            total: total.into(),
        }
    }
}

/// One purchasable line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub currency: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_list: Option<ItemList>,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payer {
    pub payment_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectUrls {
    pub return_url: String,
    pub cancel_url: String,
}

/// `POST /v1/payments/payment` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub intent: String,
    pub payer: Payer,
    pub redirect_urls: RedirectUrls,
    pub transactions: Vec<Transaction>,
}

impl CreatePaymentRequest {
    /// Build a single-line-item sale: one course at the given two-decimal
    /// total, with the client's return/cancel redirect targets.
    #[must_use]
    pub fn single_item_sale(
        item_name: &str,
        sku: &str,
        total: &str,
        return_url: String,
        cancel_url: String,
    ) -> Self {
        Self {
            intent: "sale".to_string(),
            payer: Payer {
                payment_method: "paypal".to_string(),
            },
            redirect_urls: RedirectUrls {
                return_url,
                cancel_url,
            },
            transactions: vec![Transaction {
                item_list: Some(ItemList {
                    items: vec![Item {
                        name: item_name.to_string(),
                        sku: sku.to_string(),
                        price: total.to_string(),
                        currency: "USD".to_string(),
                        quantity: 1,
                    }],
                }),
                amount: Amount::usd(total),
                description: Some(item_name.to_string()),
            }],
        }
    }
}

/// `POST /v1/payments/payment/{id}/execute` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutePaymentRequest {
    pub payer_id: String,
    pub transactions: Vec<ExecuteTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTransaction {
    pub amount: Amount,
}

/// A HATEOAS link on a payment resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// Payment resource returned by create and execute.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResource {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl PaymentResource {
    /// The buyer-approval redirect target, if the provider supplied one.
    #[must_use]
    pub fn approval_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approval_url")
            .map(|link| link.href.as_str())
    }
}

/// Error body the provider returns on rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_item_sale_shape() {
        let request = CreatePaymentRequest::single_item_sale(
            "Systems Programming",
            "3",
            "49.99",
            "http://localhost:5173/payment-return".to_string(),
            "http://localhost:5173/payment-cancel".to_string(),
        );

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["intent"], "sale");
        assert_eq!(body["payer"]["payment_method"], "paypal");
        assert_eq!(body["transactions"][0]["amount"]["total"], "49.99");
        assert_eq!(body["transactions"][0]["amount"]["currency"], "USD");
        assert_eq!(
            body["transactions"][0]["item_list"]["items"][0]["sku"],
            "3"
        );
        assert_eq!(body["transactions"][0]["item_list"]["items"][0]["quantity"], 1);
        assert_eq!(
            body["redirect_urls"]["return_url"],
            "http://localhost:5173/payment-return"
        );
    }

    #[test]
    fn test_approval_url_extraction() {
        let resource: PaymentResource = serde_json::from_value(json!({
            "id": "PAY-123",
            "state": "created",
            "links": [
                {"href": "https://api.sandbox.paypal.com/v1/payments/payment/PAY-123", "rel": "self"},
                {"href": "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-60U", "rel": "approval_url"},
                {"href": "https://api.sandbox.paypal.com/v1/payments/payment/PAY-123/execute", "rel": "execute"}
            ]
        }))
        .unwrap();

        assert_eq!(
            resource.approval_url().unwrap(),
            "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-60U"
        );
    }

    #[test]
    fn test_approval_url_missing() {
        let resource: PaymentResource = serde_json::from_value(json!({
            "id": "PAY-123",
            "links": []
        }))
        .unwrap();

        assert!(resource.approval_url().is_none());
    }
}
