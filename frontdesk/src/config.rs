//! Configuration management for the front desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use frontdesk_core::status::HoldPolicy;
use serde::{Deserialize, Serialize};
use std::env;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,frontdesk=debug,tower_http=info";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Booking rules
    pub booking: BookingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// `tracing` filter directives, e.g. `info,frontdesk=debug`
    pub log_level: String,
}

/// Booking rule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Which booking statuses hold a room (`pending-holds` or `confirmed-only`)
    pub hold_policy: HoldPolicy,
    /// Actor recorded on history rows written by the no-show sweep
    pub no_show_actor: String,
    /// Register a demo hotel on startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            },
            booking: BookingConfig {
                hold_policy: env::var("FRONTDESK_HOLD_POLICY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                no_show_actor: env::var("FRONTDESK_NO_SHOW_ACTOR")
                    .unwrap_or_else(|_| "night-audit".to_string()),
                seed_demo_data: env::var("FRONTDESK_SEED_DEMO_DATA")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        }
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                log_level: DEFAULT_LOG_FILTER.to_string(),
            },
            booking: BookingConfig {
                hold_policy: HoldPolicy::default(),
                no_show_actor: "night-audit".to_string(),
                seed_demo_data: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.booking.hold_policy, HoldPolicy::PendingHolds);
        assert!(!config.booking.seed_demo_data);
        assert_eq!(config.server.log_level, DEFAULT_LOG_FILTER);
    }
}
