//! Configuration module for environment variable parsing.
//!
//! The configuration is read once at process start and handed to every
//! component that needs it; nothing reads the environment after startup.

use std::env;

use tracing::warn;
use url::Url;

/// Default queue that normalized webhook events are published to.
pub const DEFAULT_EVENTS_QUEUE: &str = "webhook_events";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Table (key namespace) holding user records
    pub users_table: String,

    /// Table (key namespace) holding webhook records
    pub events_table: String,

    /// Redis URL for the record store. In-memory storage is used when unset.
    pub store_url: Option<String>,

    /// RabbitMQ connection URL (CloudAMQP). Events are only logged when unset.
    pub cloudamqp_url: Option<String>,

    /// Queue receiving normalized webhook events
    pub events_queue: String,

    /// Public origin used to build callable webhook URLs.
    /// Derived from the request `Host` header when unset.
    pub public_base_url: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            users_table: "users".to_string(),
            events_table: "events".to_string(),
            store_url: None,
            cloudamqp_url: None,
            events_queue: DEFAULT_EVENTS_QUEUE.to_string(),
            public_base_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),

            users_table: non_empty("USERS_TABLE").unwrap_or(defaults.users_table),

            events_table: non_empty("EVENTS_TABLE").unwrap_or(defaults.events_table),

            store_url: non_empty("STORE_URL"),

            cloudamqp_url: non_empty("CLOUDAMQP_URL"),

            events_queue: non_empty("EVENTS_QUEUE").unwrap_or(defaults.events_queue),

            public_base_url: parse_base_url("PUBLIC_BASE_URL"),
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an http(s) origin such as "https://hooks.example.com".
fn parse_base_url(name: &str) -> Option<Url> {
    let raw = non_empty(name)?;

    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {
            Some(url)
        }
        Ok(_) => {
            warn!(env_var = name, value = %raw, "Base URL must be http or https, ignoring");
            None
        }
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid base URL, ignoring");
            None
        }
    }
}
