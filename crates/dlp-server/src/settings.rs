//! Environment-sourced daemon configuration, with CLI overrides layered on
//! top for local runs.

use std::path::PathBuf;

/// Runtime configuration for the daemon, sourced from `DLP_*` environment
/// variables with defaults, then overridden by any CLI flags supplied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub database_url: String,
    pub policy_path: PathBuf,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: env_or("DLP_HOST", "0.0.0.0"),
            port: env_or("DLP_PORT", "8642").parse().unwrap_or(8642),
            debug: env_or("DLP_DEBUG", "false").parse().unwrap_or(false),
            database_url: env_or("DLP_DATABASE_URL", "sqlite://dlp-audit.sqlite?mode=rwc"),
            policy_path: PathBuf::from(env_or("DLP_POLICY_PATH", "policy.yaml")),
            log_level: env_or("DLP_LOG_LEVEL", "info"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_unset() {
        std::env::remove_var("DLP_PORT");
        let settings = Settings::default();
        assert_eq!(settings.port, 8642);
        assert_eq!(settings.host, "0.0.0.0");
    }
}
