use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::Agent;

use crate::config::{ApiSettings, Secrets};
use crate::vtex::model::{OrderDetail, OrderListPage, OrderSummary};

const APP_KEY_HEADER: &str = "X-VTEX-API-AppKey";
const APP_TOKEN_HEADER: &str = "X-VTEX-API-AppToken";

/// List endpoint page size; a shorter page means the last one
pub const PAGE_SIZE: usize = 100;

/// Thin client for the order-management API. All fetches are best-effort:
/// a failed or non-2xx request contributes nothing to the result instead
/// of failing the run.
pub struct VtexClient {
    agent: Agent,
    base_url: String,
    app_key: String,
    app_token: String,
}

impl VtexClient {
    pub fn new(api: &ApiSettings, secrets: &Secrets) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(api.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            app_key: secrets.app_key.clone(),
            app_token: secrets.app_token.clone(),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Option<T> {
        let mut request = self
            .agent
            .get(url)
            .header("Content-Type", "application/json")
            .header(APP_KEY_HEADER, &self.app_key)
            .header(APP_TOKEN_HEADER, &self.app_token);
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        // Non-2xx statuses surface as Err from call(), so every failure
        // path collapses to None here
        let mut response = request.call().ok()?;
        let body = response.body_mut().read_to_string().ok()?;
        serde_json::from_str(&body).ok()
    }

    /// List all invoiced orders for a seller inside the window, paging until
    /// the API signals the end or a request fails (partial results are kept).
    pub fn list_invoiced_orders(
        &self,
        start_utc: &str,
        end_utc: &str,
        seller_name: &str,
    ) -> Vec<OrderSummary> {
        let url = format!("{}/api/oms/pvt/orders", self.base_url);
        let date_filter = format!("invoicedDate:[{start_utc} TO {end_utc}]");

        collect_pages(|page| {
            let page_param = page.to_string();
            let result: Option<OrderListPage> = self.get_json(
                &url,
                &[
                    ("page", page_param.as_str()),
                    ("per_page", "100"),
                    ("f_status", "invoiced"),
                    ("f_sellerNames", seller_name),
                    ("f_invoicedDate", date_filter.as_str()),
                ],
            );
            if result.is_none() {
                warn!("order list request failed on page {page}; keeping partial results");
            }
            result.map(|p| p.list)
        })
    }

    /// Fetch one order's full record; None on any failure
    pub fn order_detail(&self, order_id: &str) -> Option<OrderDetail> {
        let url = format!("{}/api/oms/pvt/orders/{}", self.base_url, order_id);
        let detail: Option<OrderDetail> = self.get_json(&url, &[]);
        if detail.is_none() {
            debug!("detail fetch failed for order {order_id}");
        }
        detail
    }

    /// Fetch details for all ids with a bounded pool of blocking workers.
    /// Failed fetches are simply absent from the returned map.
    pub fn fetch_details(&self, ids: &[String], workers: usize) -> HashMap<String, OrderDetail> {
        fetch_details_with(ids, workers, |id| self.order_detail(id))
    }
}

/// Drain a paged listing. `fetch` returns None on request failure, which
/// ends pagination the same way an empty page does.
fn collect_pages<T, F>(mut fetch: F) -> Vec<T>
where
    F: FnMut(u32) -> Option<Vec<T>>,
{
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let Some(batch) = fetch(page) else { break };
        if batch.is_empty() {
            break;
        }

        let len = batch.len();
        all.extend(batch);

        if len < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    all
}

/// Run `fetch` over every id with at most `workers` concurrent calls.
/// Workers pull ids from a shared cursor and stream results back over a
/// channel; a failing fetch never aborts its siblings and completion order
/// does not matter because the output is keyed.
pub fn fetch_details_with<T, F>(ids: &[String], workers: usize, fetch: F) -> HashMap<String, T>
where
    T: Send,
    F: Fn(&str) -> Option<T> + Sync,
{
    if ids.is_empty() {
        return HashMap::new();
    }

    let workers = workers.clamp(1, ids.len());
    let cursor = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let cursor = &cursor;
            let fetch = &fetch;
            scope.spawn(move || loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(id) = ids.get(index) else { break };
                if let Some(value) = fetch(id) {
                    let _ = tx.send((id.clone(), value));
                }
            });
        }
        drop(tx);

        rx.iter().collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn pagination_drains_three_pages() {
        let requests = Mutex::new(Vec::new());
        let orders = collect_pages(|page| {
            requests.lock().unwrap().push(page);
            let count = match page {
                1 | 2 => PAGE_SIZE,
                3 => 37,
                _ => panic!("unexpected page {page}"),
            };
            Some(vec![0u8; count])
        });

        assert_eq!(orders.len(), 237);
        assert_eq!(*requests.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn pagination_stops_on_empty_page() {
        let orders = collect_pages(|page| match page {
            1 => Some(vec![0u8; PAGE_SIZE]),
            _ => Some(Vec::new()),
        });
        assert_eq!(orders.len(), PAGE_SIZE);
    }

    #[test]
    fn pagination_keeps_partial_results_on_failure() {
        let orders = collect_pages(|page| match page {
            1 => Some(vec![0u8; PAGE_SIZE]),
            _ => None,
        });
        assert_eq!(orders.len(), PAGE_SIZE);
    }

    #[test]
    fn failed_detail_fetches_are_absent() {
        let ids: Vec<String> = ["A-01", "B-01", "C-01"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let details = fetch_details_with(&ids, 8, |id| {
            if id == "B-01" {
                None // simulated timeout
            } else {
                Some(format!("detail of {id}"))
            }
        });

        assert_eq!(details.len(), 2);
        assert_eq!(details["A-01"], "detail of A-01");
        assert!(!details.contains_key("B-01"));
    }

    #[test]
    fn pool_handles_more_ids_than_workers() {
        let ids: Vec<String> = (0..100).map(|i| format!("order-{i}")).collect();
        let details = fetch_details_with(&ids, 4, |id| Some(id.len()));
        assert_eq!(details.len(), 100);
    }

    #[test]
    fn empty_input_spawns_nothing() {
        let details: HashMap<String, ()> = fetch_details_with(&[], 8, |_| Some(()));
        assert!(details.is_empty());
    }
}
