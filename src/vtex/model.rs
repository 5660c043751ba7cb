use serde::Deserialize;

/// One page of the order list endpoint
#[derive(Debug, Deserialize)]
pub struct OrderListPage {
    #[serde(default)]
    pub list: Vec<OrderSummary>,
}

/// Minimal order reference from the list endpoint; only the id is needed
/// to drive the detail fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
}

/// Full order record from the detail endpoint. Fields the report does not
/// consume are left out; serde ignores them on decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order_id: String,
    #[serde(default)]
    pub invoiced_date: Option<String>,
    #[serde(default)]
    pub sellers: Vec<OrderSeller>,
    #[serde(default)]
    pub totals: Vec<OrderTotal>,
    #[serde(default)]
    pub payment_data: Option<PaymentData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderSeller {
    #[serde(default)]
    pub id: Option<String>,
}

/// Id-tagged monetary total in integer minor units (cents)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderTotal {
    pub id: String,
    #[serde(default)]
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub installments: Option<u32>,
}

impl OrderDetail {
    /// Iterate every (transaction, payment) pair in order
    pub fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.payment_data
            .iter()
            .flat_map(|data| data.transactions.iter())
            .flat_map(|tx| tx.payments.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_detail_payload() {
        let detail: OrderDetail = serde_json::from_str(
            r#"{
                "orderId": "1100306888KDK-01",
                "invoicedDate": "2024-06-28T14:22:07.000Z",
                "sellers": [{"id": "acme", "name": "Acme Store"}],
                "totals": [
                    {"id": "Items", "value": 15000},
                    {"id": "Shipping", "value": 1200},
                    {"id": "Discounts", "value": -500}
                ],
                "paymentData": {
                    "transactions": [
                        {"payments": [{"installments": 3}, {"installments": null}]}
                    ]
                },
                "status": "invoiced"
            }"#,
        )
        .unwrap();

        assert_eq!(detail.order_id, "1100306888KDK-01");
        assert_eq!(detail.sellers[0].id.as_deref(), Some("acme"));
        assert_eq!(detail.payments().count(), 2);
        assert_eq!(detail.payments().next().unwrap().installments, Some(3));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let detail: OrderDetail =
            serde_json::from_str(r#"{"orderId": "X-01"}"#).unwrap();
        assert!(detail.sellers.is_empty());
        assert!(detail.totals.is_empty());
        assert_eq!(detail.payments().count(), 0);
    }

    #[test]
    fn decodes_list_page() {
        let page: OrderListPage = serde_json::from_str(
            r#"{"list": [{"orderId": "A-01"}, {"orderId": "B-01"}], "paging": {"total": 2}}"#,
        )
        .unwrap();
        assert_eq!(page.list.len(), 2);
        assert_eq!(page.list[1].order_id, "B-01");
    }
}
