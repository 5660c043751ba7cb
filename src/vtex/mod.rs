mod client;
mod model;

pub use client::{fetch_details_with, VtexClient, PAGE_SIZE};
pub use model::{OrderDetail, OrderListPage, OrderSeller, OrderSummary, OrderTotal, Payment, PaymentData, Transaction};
