/// Server configuration
///
/// # Environment variables
///
/// All settings can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./work_dir | Working directory (database lives here) |
/// | DATABASE_PATH | {WORK_DIR}/tabled.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | Default tracing level when RUST_LOG unset |
/// | HOLD_JANITOR_INTERVAL_SECS | 60 | Stale-hold relabel sweep interval |
/// | OFFER_PURGE_INTERVAL_SECS | 3600 | Expired-offer purge interval |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and local files
    pub work_dir: String,
    /// SQLite database file path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Default log level
    pub log_level: String,
    /// Seconds between stale-hold janitor sweeps
    pub hold_janitor_interval_secs: u64,
    /// Seconds between expired-offer purge runs
    pub offer_purge_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{work_dir}/tabled.db"));

        Self {
            work_dir,
            database_path,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            hold_janitor_interval_secs: std::env::var("HOLD_JANITOR_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            offer_purge_interval_secs: std::env::var("OFFER_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3600),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
