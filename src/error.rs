use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Config directory not found at {0}. Run 'circreport init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Required environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Sellers file not found: {0}")]
    SellersFileNotFound(PathBuf),

    #[error("Sellers file {path} is missing required column '{column}'")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },

    #[error("Failed to read sellers file {path}: {source}")]
    SellersParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid date '{value}'. Expected format {expected}.")]
    InvalidDate {
        value: String,
        expected: &'static str,
    },

    #[error("Invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to compose email: {0}")]
    MailCompose(#[from] lettre::error::Error),

    #[error("Failed to deliver email: {0}")]
    MailDelivery(#[from] lettre::transport::smtp::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, ReportError>;
