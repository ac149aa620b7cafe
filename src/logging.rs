//! Logging setup for the command-line front end, built on
//! `tracing-subscriber`.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! a subscriber is installed.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Honor `RUST_LOG` when set instead of `level_filter`.
    pub use_env_filter: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    pub fn from_verbosity(verbose: u8) -> Self {
        let level_filter = match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        Self {
            level_filter,
            use_env_filter: verbose == 0,
            ..Self::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::default().add_directive(self.level_filter.into());
        if self.use_env_filter {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
        } else {
            fallback()
        }
    }
}

/// Installs the global subscriber, writing to stderr.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.with_ansi)
                .with_target(false),
        )
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level_filter, LevelFilter::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level_filter, LevelFilter::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level_filter, LevelFilter::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level_filter, LevelFilter::TRACE);
        assert!(LogConfig::from_verbosity(0).use_env_filter);
        assert!(!LogConfig::from_verbosity(1).use_env_filter);
    }
}
