//! Logging configuration for quality-guard.
//!
//! The library only emits `tracing` events; applications decide where they go.
//! [`init_logging`] installs a `tracing-subscriber` registry with an
//! environment filter and either plain or JSON output.

use tracing::Level;

use crate::error::{QualityError, Result};

/// Configuration for the logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for everything outside this crate
    pub level: Level,
    /// Log level for quality-guard components
    pub crate_level: Level,
    /// Whether to use JSON output format
    pub json_format: bool,
    /// Environment filter override
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            crate_level: Level::INFO,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Creates a configuration for production use.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            crate_level: Level::INFO,
            json_format: true,
            env_filter: None,
        }
    }

    /// Creates a configuration for debugging detector decisions.
    pub fn verbose() -> Self {
        Self {
            level: Level::INFO,
            crate_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_crate_level(mut self, level: Level) -> Self {
        self.crate_level = level;
        self
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        match self.env_filter {
            Some(ref filter) => filter.clone(),
            None => format!(
                "{},quality_guard={}",
                self.level.as_str().to_lowercase(),
                self.crate_level.as_str().to_lowercase()
            ),
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured levels. Fails when a
/// global subscriber is already set.
///
/// # Examples
///
/// ```rust,no_run
/// use quality_guard::logging::{init_logging, LoggingConfig};
///
/// init_logging(LoggingConfig::verbose().with_json_format(true)).unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| QualityError::invalid_input(format!("Failed to initialize logging: {e}")))
}

/// Truncates a string to the maximum field length if needed.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}
