use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::config::Seller;
use crate::vtex::{OrderDetail, OrderTotal};
use crate::window::business_tz;

const ITEMS_TOTAL_ID: &str = "Items";
const SHIPPING_TOTAL_ID: &str = "Shipping";

/// One accounting row per (transaction, payment) pair of an invoiced order.
/// Serde renames carry the column contract of the delivered report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Faturado em")]
    pub invoiced_date: String,
    #[serde(rename = "Pedido")]
    pub order_id: String,
    #[serde(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Total_itens")]
    pub items_total: f64,
    #[serde(rename = "Frete")]
    pub shipping_total: f64,
    #[serde(rename = "Valor_total")]
    pub grand_total: f64,
    #[serde(rename = "Parcelas")]
    pub installments: Option<u32>,
}

/// Render an ISO-8601 timestamp as dd/mm/yyyy in the business timezone.
/// Unparseable input passes through unchanged so a malformed order date
/// degrades to an odd cell instead of a failed run.
pub fn format_short_date(iso: &str) -> String {
    if iso.is_empty() {
        return String::new();
    }
    match DateTime::parse_from_rfc3339(iso) {
        Ok(instant) => instant
            .with_timezone(&business_tz())
            .format("%d/%m/%Y")
            .to_string(),
        Err(_) => iso.to_string(),
    }
}

fn total_amount(totals: &[OrderTotal], id: &str) -> f64 {
    totals
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.value as f64 / 100.0)
        .unwrap_or(0.0)
}

/// Project an order into report rows for one seller. Orders the seller did
/// not participate in produce nothing; otherwise one row per payment, all
/// carrying the same order-level totals.
pub fn project_rows(order: &OrderDetail, seller: &Seller) -> Vec<ReportRow> {
    let participates = order
        .sellers
        .iter()
        .any(|s| s.id.as_deref() == Some(seller.id.as_str()));
    if !participates {
        return Vec::new();
    }

    let items_total = total_amount(&order.totals, ITEMS_TOTAL_ID);
    let shipping_total = total_amount(&order.totals, SHIPPING_TOTAL_ID);
    let grand_total = items_total + shipping_total;
    let invoiced_date = order
        .invoiced_date
        .as_deref()
        .map(format_short_date)
        .unwrap_or_default();

    order
        .payments()
        .map(|payment| ReportRow {
            invoiced_date: invoiced_date.clone(),
            order_id: order.order_id.clone(),
            seller: seller.display_name.clone(),
            items_total,
            shipping_total,
            grand_total,
            installments: payment.installments,
        })
        .collect()
}

/// Drop exact duplicate rows, keeping first occurrence order
pub fn dedup_rows(rows: Vec<ReportRow>) -> Vec<ReportRow> {
    let mut unique: Vec<ReportRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if !unique.contains(&row) {
            unique.push(row);
        }
    }
    unique
}
