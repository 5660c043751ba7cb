mod circularize;
mod generator;
mod project;
mod writer;

pub use circularize::{circularize, due_date, CircularizedRow, MAX_INSTALLMENTS};
pub use generator::generate_report;
pub use project::{dedup_rows, format_short_date, project_rows, ReportRow};
pub use writer::{read_rows, write_circularized, write_rows};
