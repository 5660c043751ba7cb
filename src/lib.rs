pub mod config;
pub mod error;
pub mod mail;
pub mod report;
pub mod vtex;
pub mod window;

pub use config::{Config, Secrets, Seller};
pub use error::{ReportError, Result};
pub use report::{generate_report, CircularizedRow, ReportRow};
pub use window::ReportWindow;
