use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiSettings,
    pub mail: MailSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_workers: Option<usize>,
}

impl ApiSettings {
    /// Detail-fetch pool size, bounded so a large order batch cannot
    /// flood the remote API
    pub fn max_workers(&self) -> usize {
        self.max_workers
            .unwrap_or_else(default_max_workers)
            .max(1)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportSettings {
    pub seller_id: String,
    pub sellers_file: String,
    pub raw_dir: String,
    pub circularized_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_max_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (cpus * 4).min(32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://store.example.com"

            [mail]
            server = "smtp.example.com"
            port = 465

            [report]
            seller_id = "acme"
            sellers_file = "sellers.csv"
            raw_dir = "output/raw"
            circularized_dir = "output/circ"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.report.log_dir, "logs");
        assert!(config.api.max_workers() >= 1);
    }

    #[test]
    fn max_workers_override_wins() {
        let api = ApiSettings {
            base_url: String::new(),
            timeout_secs: 30,
            max_workers: Some(7),
        };
        assert_eq!(api.max_workers(), 7);
    }

    #[test]
    fn default_pool_is_bounded() {
        assert!(default_max_workers() <= 32);
        assert!(default_max_workers() >= 1);
    }
}
