// Application state module
// Immutable configuration snapshot shared by all connections

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;

/// Application state
///
/// Built once at startup and handed to every connection behind an `Arc`.
/// Nothing on the request path mutates it except the connection counter.
pub struct AppState {
    pub config: Config,
    /// Resolved location of the backing CSV
    pub dataset_path: PathBuf,
    /// Resolved location of the page template
    pub template_path: PathBuf,
    /// Number of connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            dataset_path: config.dataset_path(),
            template_path: config.template_path(),
            active_connections: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
