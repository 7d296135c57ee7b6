use clap::{Args, ValueEnum};
use std::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct Logger {
    /// Log output format
    #[arg(long, env = "FUXI_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log level
    #[arg(long, env = "FUXI_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Logger {
    /// Installs the global subscriber. Logs go to stderr so stdout stays
    /// reserved for command output.
    pub fn init(&self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_new(self.log_level.to_string())
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let installed = match self.log_format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tfmt::layer()
                        .json()
                        .with_current_span(false)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            LogFormat::Text => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tfmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FuxiError;

    #[test]
    fn test_second_init_is_reported() {
        let logger = Logger::default();
        let _ = logger.init();

        let err: FuxiError = logger.init().unwrap_err().into();
        assert!(matches!(err, FuxiError::Anyhow(_)));
        assert!(err.to_string().contains("failed to initialize logging"));
    }
}
