use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level config (wellkit.toml + WELLKIT_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WellkitConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Which delivery backend the daemon wires into the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum NotifierBackend {
    /// Log-only delivery — default for development.
    #[default]
    Log,
    /// POST fired reminders to `notifier.webhook_url` as JSON.
    Webhook,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub backend: NotifierBackend,
    /// Required when backend = "webhook".
    pub webhook_url: Option<String>,
    /// Per-delivery HTTP timeout in seconds.
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            backend: NotifierBackend::Log,
            webhook_url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

impl WellkitConfig {
    /// Load config from a TOML file with WELLKIT_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.wellkit/wellkit.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: WellkitConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WELLKIT_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wellkit/wellkit.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wellkit/wellkit.db", home)
}

fn default_webhook_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_log_notifier() {
        let config = WellkitConfig::default();
        assert_eq!(config.notifier.backend, NotifierBackend::Log);
        assert!(config.notifier.webhook_url.is_none());
        assert!(config.database.path.ends_with("wellkit.db"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        // Figment treats a missing TOML file as an empty provider, so the
        // serde defaults fill in everything.
        let config = WellkitConfig::load(Some("/nonexistent/wellkit.toml")).expect("load");
        assert_eq!(config.notifier.backend, NotifierBackend::Log);
    }

    #[test]
    fn env_vars_override_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "wellkit.toml",
                r#"
                    [database]
                    path = "/from/file.db"

                    [notifier]
                    backend = "log"
                "#,
            )?;
            jail.set_env("WELLKIT_DATABASE_PATH", "/from/env.db");
            jail.set_env("WELLKIT_NOTIFIER_BACKEND", "webhook");

            let config = WellkitConfig::load(Some("wellkit.toml")).expect("load");
            assert_eq!(config.database.path, "/from/env.db");
            assert_eq!(config.notifier.backend, NotifierBackend::Webhook);
            // Untouched by env, so the file (or default) still applies.
            assert_eq!(config.notifier.timeout_secs, 10);
            Ok(())
        });
    }
}
