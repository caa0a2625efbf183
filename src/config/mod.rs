// Configuration module entry point
// Loads layered configuration and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Environment variable prefix, e.g. `DOGVIZ__SERVER__PORT=5001`
const ENV_PREFIX: &str = "DOGVIZ";

/// File name of the backing dataset inside the static root
pub const DATASET_FILE_NAME: &str = "dog_output_file.csv";

impl Config {
    /// Load configuration using the first CLI argument as the config path,
    /// falling back to `config` (i.e. `config.toml`)
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5001)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "dogviz")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("assets.static_dir", "static")?
            .set_default("assets.template_dir", "templates")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Location of the backing CSV
    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(&self.assets.static_dir).join(DATASET_FILE_NAME)
    }

    /// Location of the page template
    pub fn template_path(&self) -> PathBuf {
        PathBuf::from(&self.assets.template_dir).join("index.html")
    }
}

#[cfg(test)]
pub(crate) fn test_config(static_dir: &str) -> Config {
    use types::{AssetsConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            show_headers: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        },
        http: HttpConfig {
            server_name: "dogviz".to_string(),
            enable_cors: false,
            max_body_size: 1024,
        },
        assets: AssetsConfig {
            static_dir: static_dir.to_string(),
            template_dir: format!("{static_dir}/templates"),
            ..AssetsConfig::default()
        },
    }
}
