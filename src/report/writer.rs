use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::report::circularize::{CircularizedRow, MAX_INSTALLMENTS};
use crate::report::project::ReportRow;

/// Write the raw row set; headers come from the row's serde renames
pub fn write_rows(path: &PathBuf, rows: &[ReportRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a previously written raw row file back
pub fn read_rows(path: &PathBuf) -> Result<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize::<ReportRow>() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Write the circularized row set: the raw columns followed by
/// `Parcela 1..12`, empty where no due date applies
pub fn write_circularized(path: &PathBuf, rows: &[CircularizedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = [
        "Faturado em",
        "Pedido",
        "Seller",
        "Total_itens",
        "Frete",
        "Valor_total",
        "Parcelas",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for number in 1..=MAX_INSTALLMENTS {
        header.push(format!("Parcela {number}"));
    }
    writer.write_record(&header)?;

    for entry in rows {
        let row = &entry.row;
        let mut record = vec![
            row.invoiced_date.clone(),
            row.order_id.clone(),
            row.seller.clone(),
            row.items_total.to_string(),
            row.shipping_total.to_string(),
            row.grand_total.to_string(),
            row.installments.map(|n| n.to_string()).unwrap_or_default(),
        ];
        for due in &entry.due_dates {
            record.push(due.clone().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
