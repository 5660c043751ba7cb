mod secrets;
mod seller;
mod settings;

pub use secrets::{Secrets, ENV_APP_KEY, ENV_APP_TOKEN, ENV_SMTP_PASSWORD, ENV_SMTP_USER};
pub use seller::{clean_emails, load_sellers, Seller};
pub use settings::{ApiSettings, Config, MailSettings, ReportSettings};

use crate::error::{ReportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.circreport/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "circreport") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.circreport/
    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".circreport"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ and resolve relative paths against the config directory
pub fn resolve_path(value: &str, config_dir: &PathBuf) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &PathBuf) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(ReportError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "https://yourstore.vtexcommercestable.com.br"
# timeout_secs = 30        # per-request timeout
# max_workers = 16         # detail-fetch pool size, default min(32, 4 x CPUs)

[mail]
server = "smtp.example.com"
port = 465

[report]
seller_id = "examplestore"       # seller to report on, matched against sellerId
sellers_file = "sellers.csv"     # relative paths resolve against this directory
raw_dir = "output/raw"
circularized_dir = "output/circularized"
log_dir = "logs"
"#;

/// Template content for sellers.csv
pub const SELLERS_TEMPLATE: &str = "\
sellerId,sellerName,emailTo,emailCc,ativo
examplestore,Example Store,finance@example.com;ops@example.com,audit@example.com,sim
otherstore,Other Store,,,nao
";
