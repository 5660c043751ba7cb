use crate::error::{ReportError, Result};

pub const ENV_APP_KEY: &str = "VTEX_APP_KEY";
pub const ENV_APP_TOKEN: &str = "VTEX_APP_TOKEN";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";

/// Credentials pulled from the environment at startup. Never read from
/// config files so they stay out of the config directory.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub app_key: String,
    pub app_token: String,
    pub smtp_user: String,
    pub smtp_password: String,
}

impl Secrets {
    /// Load all required credentials, failing on the first missing one
    /// before any other work happens.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            app_key: require_env(ENV_APP_KEY)?,
            app_token: require_env(ENV_APP_TOKEN)?,
            smtp_user: require_env(ENV_SMTP_USER)?,
            smtp_password: require_env(ENV_SMTP_PASSWORD)?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ReportError::MissingEnv(name))
}
