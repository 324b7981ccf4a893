use anyhow::{Context, Result};

/// Port the HTTP listener binds to. Sensors and the dashboard are built against it.
pub const LISTEN_PORT: u16 = 8888;

const DEFAULT_DB_PORT: u16 = 3306;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub rust_log: String,
}

/// Connection parameters for the MySQL server holding `sensor_data`.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

// Keeps the password out of startup logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let port = match lookup("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("DB_PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Config {
            db: DbConfig {
                host: require("DB_HOST")?,
                port,
                user: require("DB_USER")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: require("DB_NAME")?,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_db_port_defaults_to_3306() {
        let vars = env(&[("DB_HOST", "db"), ("DB_USER", "sensor"), ("DB_NAME", "sensors")]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.db.port, 3306);
        assert_eq!(config.db.password, "");
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_explicit_values_are_used() {
        let vars = env(&[
            ("DB_HOST", "10.0.0.5"),
            ("DB_USER", "sensor"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "sensors"),
            ("DB_PORT", "3307"),
            ("RUST_LOG", "debug"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.db.host, "10.0.0.5");
        assert_eq!(config.db.port, 3307);
        assert_eq!(config.db.password, "hunter2");
        assert_eq!(config.rust_log, "debug");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let vars = env(&[
            ("DB_HOST", "db"),
            ("DB_USER", "sensor"),
            ("DB_NAME", "sensors"),
            ("DB_PORT", "not-a-port"),
        ]);
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn test_missing_host_is_rejected() {
        let vars = env(&[("DB_USER", "sensor"), ("DB_NAME", "sensors")]);
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("DB_HOST"));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let vars = env(&[
            ("DB_HOST", "db"),
            ("DB_USER", "sensor"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "sensors"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
