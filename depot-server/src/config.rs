//! Server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which persistence backend `AppState` wires in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx (production)
    Postgres,
    /// In-process tables (development, tests)
    Memory,
}

/// Where receipt notifications go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyBackend {
    /// AWS SES
    Ses,
    /// Write the rendered message to the log
    Log,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL (required for the postgres backend)
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    /// Session lifetime
    pub session_ttl: Duration,
    /// Deadline for one request's store work
    pub request_timeout: Duration,
    /// Bounded capacity of the notification queue
    pub notify_queue_capacity: usize,
    pub notify_backend: NotifyBackend,
    /// Operational mailbox that receives order receipts
    pub receipt_mailbox: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// Log level filter when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
    /// Admin account created at startup if missing (ADMIN_USERNAME / ADMIN_PASSWORD)
    pub bootstrap_admin: Option<(String, String)>,
}

impl Config {
    /// Require a value: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str, dev_default: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                dev_default.to_string()
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";

        let store_backend = match std::env::var("STORE_BACKEND").ok().as_deref() {
            Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(format!("Unknown STORE_BACKEND: {other}").into()),
            None if production => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL must be set for the postgres store backend".into());
        }

        let notify_backend = match std::env::var("NOTIFY_BACKEND").ok().as_deref() {
            Some("ses") => NotifyBackend::Ses,
            Some("log") => NotifyBackend::Log,
            Some(other) => return Err(format!("Unknown NOTIFY_BACKEND: {other}").into()),
            None if production => NotifyBackend::Ses,
            None => NotifyBackend::Log,
        };

        Ok(Self {
            environment: environment.clone(),
            http_port: Self::parse_or("HTTP_PORT", 8080),
            database_url,
            store_backend,
            session_ttl: Duration::from_secs(Self::parse_or("SESSION_TTL_SECS", 86_400)),
            request_timeout: Duration::from_millis(Self::parse_or("REQUEST_TIMEOUT_MS", 10_000)),
            notify_queue_capacity: Self::parse_or("NOTIFY_QUEUE_CAPACITY", 256).max(1),
            notify_backend,
            receipt_mailbox: std::env::var("RECEIPT_MAILBOX")
                .unwrap_or_else(|_| "orders@depot.local".into()),
            ses_from_email: Self::require_secret(
                "SES_FROM_EMAIL",
                &environment,
                "noreply@depot.local",
            )?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: Self::parse_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            bootstrap_admin: std::env::var("ADMIN_USERNAME")
                .ok()
                .filter(|s| !s.is_empty())
                .zip(std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty())),
        })
    }

    /// Development defaults: memory store, log notifications, short timeouts.
    pub fn for_tests() -> Self {
        Self {
            environment: "development".into(),
            http_port: 0,
            database_url: None,
            store_backend: StoreBackend::Memory,
            session_ttl: Duration::from_secs(3_600),
            request_timeout: Duration::from_secs(5),
            notify_queue_capacity: 16,
            notify_backend: NotifyBackend::Log,
            receipt_mailbox: "orders@depot.test".into(),
            ses_from_email: "noreply@depot.test".into(),
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            bootstrap_admin: None,
        }
    }
}
