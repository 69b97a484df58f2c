//! Application settings.
//!
//! Settings come from an optional TOML file (`tabledesk.toml`, or the path in
//! `TABLEDESK_CONFIG`) and are then overridden by environment variables, which
//! may in turn come from a `.env` file loaded in `main`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, str::FromStr};
use tracing::{debug, info};

/// Default location of the settings file.
pub const DEFAULT_CONFIG_PATH: &str = "tabledesk.toml";

/// Which pair of resources this deployment serves.
///
/// The two instances are independent: each has its own database and only
/// answers for its own two endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instance {
    /// Products and transactions
    #[default]
    Inventory,
    /// Teachers (`guru`) and schedules (`jadwal`)
    School,
}

impl FromStr for Instance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "inventory" => Ok(Self::Inventory),
            "school" => Ok(Self::School),
            other => Err(Error::Config {
                message: format!("Unknown instance '{other}', expected 'inventory' or 'school'"),
            }),
        }
    }
}

/// Top-level settings for the server binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resource pair served by this deployment
    pub instance: Instance,
    /// SeaORM connection string (`sqlite://...` or `mysql://...`)
    pub database_url: String,
    /// Socket address the HTTP listener binds to
    pub bind_addr: String,
    /// Path of the single API route, e.g. `/api`
    pub api_path: String,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instance: Instance::Inventory,
            database_url: "sqlite://data/tabledesk.sqlite?mode=rwc".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
            api_path: "/api".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides using the given lookup function.
    ///
    /// Recognised variables: `TABLEDESK_INSTANCE`, `DATABASE_URL`,
    /// `TABLEDESK_BIND`, `TABLEDESK_API_PATH`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(instance) = lookup("TABLEDESK_INSTANCE") {
            self.instance = instance.parse()?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(bind) = lookup("TABLEDESK_BIND") {
            self.bind_addr = bind;
        }
        if let Some(path) = lookup("TABLEDESK_API_PATH") {
            self.api_path = path;
        }
        if !self.api_path.starts_with('/') {
            self.api_path.insert(0, '/');
        }
        Ok(())
    }
}

/// Parses settings from TOML text. Absent keys keep their defaults.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Builds the effective settings: file (if present), then environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path =
        std::env::var("TABLEDESK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No settings file at {path}, using defaults.");
        AppConfig::default()
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            instance = "school"
            database_url = "sqlite://school.sqlite?mode=rwc"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.instance, Instance::School);
        assert_eq!(config.database_url, "sqlite://school.sqlite?mode=rwc");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.api_path, "/api");
    }

    #[test]
    fn test_parse_rejects_unknown_instance() {
        let result = parse_config(r#"instance = "library""#);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TABLEDESK_INSTANCE", "School"),
            ("DATABASE_URL", "mysql://root@localhost/sekolah"),
            ("TABLEDESK_API_PATH", "restapi/api.php"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.instance, Instance::School);
        assert_eq!(config.database_url, "mysql://root@localhost/sekolah");
        assert_eq!(config.api_path, "/restapi/api.php");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_env_override_bad_instance() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "TABLEDESK_INSTANCE").then(|| "nope".to_string())
        });
        assert!(result.is_err());
    }
}
