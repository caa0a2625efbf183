//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Startup and shutdown banners
//! - Access logging with multiple formats
//! - Dataset sampling and failure reporting
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown
/// `logging.level` is rejected.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

/// Before `init` every level is written
fn enabled(level: LogLevel) -> bool {
    match writer::get() {
        Some(w) => w.enabled(level),
        None => true,
    }
}

fn write_access_line(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

fn write_info(message: &str) {
    if enabled(LogLevel::Info) {
        write_access_line(message);
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, dataset: &Path) {
    write_info("======================================");
    write_info("dogviz started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    match config.server.workers {
        Some(workers) => write_info(&format!("Worker threads: {workers}")),
        None => write_info("Worker threads: CPU cores"),
    }
    write_info(&format!("Static root: {}", config.assets.static_dir));
    write_info(&format!("Dataset: {}", dataset.display()));
    if !dataset.exists() {
        log_warning(&format!(
            "Dataset file does not exist yet, /get_dog_data will fail: {}",
            dataset.display()
        ));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_shutdown(active_connections: usize) {
    write_info(&format!(
        "[Shutdown] Listener closed, {active_connections} connection(s) still draining"
    ));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        write_info(&format!("[Headers] Count: {count}"));
    }
}

pub fn log_sample_served(sampled: usize, total: usize) {
    write_info(&format!("[Data] Sampled {sampled} of {total} rows"));
}

pub fn log_dataset_error(err: &crate::dataset::DatasetError) {
    log_error(&format!("Dataset unavailable: {err}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access_line(&entry.format(format));
}
