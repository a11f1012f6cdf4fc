use std::sync::Arc;

use crate::config::AppConfig;
use crate::library::Library;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Everything here is read-only after startup apart from the metric counters.
/// In particular the sort mode is not stored here: each request carries its own.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Root-confined listing and delivery.
    pub library: Library,
    /// `ip:port` advertised on the listing page.
    pub advertised_addr: Arc<str>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: AppConfig, library: Library, advertised_addr: String, metrics: Metrics) -> Self {
        Self { config: Arc::new(config), library, advertised_addr: advertised_addr.into(), metrics }
    }
}
