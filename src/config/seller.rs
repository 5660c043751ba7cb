use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ReportError, Result};

/// One active entry from the seller directory
#[derive(Debug, Clone)]
pub struct Seller {
    pub id: String,
    pub display_name: String,
    pub email_to: Vec<String>,
    pub email_cc: Vec<String>,
}

/// Raw CSV record; emailTo/emailCc/ativo columns are optional in the file
#[derive(Debug, Deserialize)]
struct SellerRecord {
    #[serde(rename = "sellerId")]
    seller_id: String,
    #[serde(rename = "sellerName")]
    seller_name: String,
    #[serde(rename = "emailTo", default)]
    email_to: String,
    #[serde(rename = "emailCc", default)]
    email_cc: String,
    #[serde(default)]
    ativo: String,
}

/// Load the seller directory, keeping only rows marked active
/// (`ativo` equals "sim", case-insensitively), in file order.
pub fn load_sellers(path: &PathBuf) -> Result<Vec<Seller>> {
    if !path.exists() {
        return Err(ReportError::SellersFileNotFound(path.clone()));
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| ReportError::SellersParse {
        path: path.clone(),
        source: e,
    })?;

    // Required identity columns must be present up front
    let headers = reader
        .headers()
        .map_err(|e| ReportError::SellersParse {
            path: path.clone(),
            source: e,
        })?
        .clone();
    for column in ["sellerId", "sellerName"] {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn {
                path: path.clone(),
                column,
            });
        }
    }

    let mut sellers = Vec::new();
    for record in reader.deserialize::<SellerRecord>() {
        let record = record.map_err(|e| ReportError::SellersParse {
            path: path.clone(),
            source: e,
        })?;

        if !record.ativo.trim().eq_ignore_ascii_case("sim") {
            continue;
        }

        sellers.push(Seller {
            id: record.seller_id.trim().to_string(),
            display_name: record.seller_name.trim().to_string(),
            email_to: clean_emails(&record.email_to),
            email_cc: clean_emails(&record.email_cc),
        });
    }

    Ok(sellers)
}

/// Split a semicolon-delimited address list, dropping empty, whitespace-only
/// and literal "nan" tokens (spreadsheet exports leave those behind).
pub fn clean_emails(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case("nan"))
        .map(str::to_string)
        .collect()
}
