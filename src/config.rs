//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::fmt;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// `None` runs against the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub seed_demo: bool,
    pub offer_price_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}='{}': {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database = match non_empty("DATABASE_URL") {
            Some(url) => {
                let max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
                    Some(raw) => match raw.parse::<u32>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(ConfigError {
                                key: "DATABASE_MAX_CONNECTIONS",
                                value: raw,
                                reason: "expected a positive integer",
                            });
                        }
                    },
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                Some(DatabaseConfig { url, max_connections })
            }
            None => None,
        };

        let seed_demo = match non_empty("SEED_DEMO") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError {
                key: "SEED_DEMO",
                value: raw,
                reason: "expected true or false",
            })?,
            None => database.is_none(),
        };

        let offer_price_max = match non_empty("OFFER_PRICE_MAX") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(max) if max.is_finite() && max > 0.0 => Some(max),
                _ => {
                    return Err(ConfigError {
                        key: "OFFER_PRICE_MAX",
                        value: raw,
                        reason: "expected a positive number",
                    });
                }
            },
            None => None,
        };

        Ok(Self { bind_addr, database, seed_demo, offer_price_max })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
