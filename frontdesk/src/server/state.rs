//! Application state for the front desk HTTP server.

use crate::app::FrontDesk;
use crate::config::Config;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the services inside are shared.
#[derive(Clone)]
pub struct AppState {
    /// The booking engine
    pub front_desk: FrontDesk,
    /// Actor recorded on history rows written by the no-show sweep
    pub no_show_actor: String,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(front_desk: FrontDesk, no_show_actor: impl Into<String>) -> Self {
        Self {
            front_desk,
            no_show_actor: no_show_actor.into(),
        }
    }

    /// State for `front_desk` using the configured no-show actor.
    #[must_use]
    pub fn from_config(front_desk: FrontDesk, config: &Config) -> Self {
        Self::new(front_desk, config.booking.no_show_actor.clone())
    }
}
