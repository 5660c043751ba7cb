use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{load_sellers, resolve_path, Config, Secrets};
use crate::error::Result;
use crate::mail::Mailer;
use crate::report::circularize::circularize;
use crate::report::project::{dedup_rows, project_rows};
use crate::report::writer::{read_rows, write_circularized, write_rows};
use crate::vtex::VtexClient;
use crate::window::ReportWindow;

/// Run the full daily pipeline for the configured seller: fetch invoiced
/// orders in the window, project accounting rows, write the raw file,
/// circularize into due-date columns and email the result.
pub fn generate_report(
    config: &Config,
    secrets: &Secrets,
    window: &ReportWindow,
    config_dir: &PathBuf,
    skip_email: bool,
) -> Result<()> {
    let sellers_file = resolve_path(&config.report.sellers_file, config_dir);
    let sellers = load_sellers(&sellers_file)?;
    info!(
        "{} active sellers: {:?}",
        sellers.len(),
        sellers.iter().map(|s| s.display_name.as_str()).collect::<Vec<_>>()
    );

    let target = &config.report.seller_id;
    let Some(seller) = sellers.iter().find(|s| s.id.eq_ignore_ascii_case(target)) else {
        warn!("no active seller matching '{target}'; nothing to report");
        return Ok(());
    };

    // Fetch summaries, then details with the bounded pool
    let client = VtexClient::new(&config.api, secrets);
    let summaries =
        client.list_invoiced_orders(&window.start_utc, &window.end_utc, &seller.display_name);
    info!(
        "{} invoiced orders for {} on {}",
        summaries.len(),
        seller.display_name,
        window.date_label
    );

    let ids: Vec<String> = summaries.into_iter().map(|s| s.order_id).collect();
    let details = client.fetch_details(&ids, config.api.max_workers());
    if details.len() < ids.len() {
        warn!(
            "{} of {} order details could not be fetched",
            ids.len() - details.len(),
            ids.len()
        );
    }

    // Project rows in summary order so the report is stable across runs
    let mut rows = Vec::new();
    for id in &ids {
        if let Some(detail) = details.get(id) {
            rows.extend(project_rows(detail, seller));
        }
    }
    let rows = dedup_rows(rows);

    let raw_path = resolve_path(&config.report.raw_dir, config_dir)
        .join(format!("orders_{}.csv", window.date_iso));
    write_rows(&raw_path, &rows)?;
    info!("wrote {} raw rows to {}", rows.len(), raw_path.display());

    // Circularize from the persisted file, not the in-memory rows
    let reloaded = read_rows(&raw_path)?;
    let circularized = circularize(&reloaded);

    let circ_path = resolve_path(&config.report.circularized_dir, config_dir).join(format!(
        "{}_{}.csv",
        file_slug(&seller.display_name),
        window.date_suffix
    ));
    write_circularized(&circ_path, &circularized)?;
    info!(
        "wrote {} circularized rows to {}",
        circularized.len(),
        circ_path.display()
    );

    if skip_email {
        info!("email delivery skipped by request");
    } else {
        let mailer = Mailer::new(&config.mail, secrets);
        mailer.send_report(&circ_path, seller, &window.date_label)?;
    }

    info!("report run finished");
    Ok(())
}

/// Seller display name as a filename-safe slug
fn file_slug(display_name: &str) -> String {
    display_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_collapse_whitespace() {
        assert_eq!(file_slug("Acme  Store"), "Acme-Store");
        assert_eq!(file_slug("Acme"), "Acme");
    }
}
