//! Process-wide logging setup
//!
//! [`RuntimeSettings`] is derived once from the resolved configuration and then
//! passed to every command. [`init`] installs the global tracing subscriber;
//! after the first call logging can no longer be reconfigured.

use std::fmt;
use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tfmt, Layer};

use crate::config::{ResolvedConfig, PRETTY_LOGS, VERBOSITY};

/// Named checkpoints of the verbosity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Panic,
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Silent => "silent",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}

/// Verbosity on the 0-700 scale. Values outside the range are kept as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(i64);

impl Verbosity {
    pub const DEFAULT: Verbosity = Verbosity(500);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Checkpoint at or below this value; below 0 is silent, above 700 is trace.
    pub fn level(self) -> LogLevel {
        match self.0 {
            i64::MIN..=99 => LogLevel::Silent,
            100..=199 => LogLevel::Panic,
            200..=299 => LogLevel::Fatal,
            300..=399 => LogLevel::Error,
            400..=499 => LogLevel::Warning,
            500..=599 => LogLevel::Info,
            600..=699 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Filter for the tracing subscriber. Panic and fatal collapse onto error.
    pub fn level_filter(self) -> LevelFilter {
        match self.level() {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.level())
    }
}

/// Output mode of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Immutable logging settings shared by every command of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeSettings {
    pub verbosity: Verbosity,
    pub format: LogFormat,
}

impl RuntimeSettings {
    pub fn new(verbosity: Verbosity, format: LogFormat) -> Self {
        Self { verbosity, format }
    }

    /// Derive settings from resolved configuration, falling back to defaults
    /// for keys that are missing.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let verbosity = config
            .get_int(VERBOSITY.name)
            .map(Verbosity::new)
            .unwrap_or_default();
        let format = config
            .get_bool(PRETTY_LOGS.name)
            .map(LogFormat::from_pretty)
            .unwrap_or_default();
        Self { verbosity, format }
    }
}

/// Build a subscriber for `settings` writing to `writer`, without installing it.
pub fn build_subscriber<W>(
    settings: &RuntimeSettings,
    writer: W,
    ansi: bool,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = settings.verbosity.level_filter();
    let registry = tracing_subscriber::registry();

    match settings.format {
        LogFormat::Json => Box::new(
            registry.with(
                tfmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(true)
                    .with_filter(filter),
            ),
        ),
        LogFormat::Pretty => Box::new(
            registry.with(
                tfmt::layer()
                    .with_writer(writer)
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_thread_names(false)
                    .with_filter(filter),
            ),
        ),
    }
}

/// Install the global subscriber writing to stderr.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one stays in effect.
pub fn init(settings: &RuntimeSettings) -> bool {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("Tracing subscriber already set");
        return false;
    }

    let ansi = std::io::stderr().is_terminal();
    let subscriber = build_subscriber(settings, std::io::stderr, ansi);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    tracing::debug!(
        verbosity = settings.verbosity.value(),
        level = %settings.verbosity.level(),
        format = %settings.format,
        "logging initialized"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_checkpoints_when_mapping_then_named_levels() {
        assert_eq!(Verbosity::new(0).level(), LogLevel::Silent);
        assert_eq!(Verbosity::new(100).level(), LogLevel::Panic);
        assert_eq!(Verbosity::new(200).level(), LogLevel::Fatal);
        assert_eq!(Verbosity::new(300).level(), LogLevel::Error);
        assert_eq!(Verbosity::new(400).level(), LogLevel::Warning);
        assert_eq!(Verbosity::new(500).level(), LogLevel::Info);
        assert_eq!(Verbosity::new(600).level(), LogLevel::Debug);
        assert_eq!(Verbosity::new(700).level(), LogLevel::Trace);
    }

    #[test]
    fn given_values_between_checkpoints_when_mapping_then_rounds_down() {
        assert_eq!(Verbosity::new(99).level(), LogLevel::Silent);
        assert_eq!(Verbosity::new(450).level(), LogLevel::Warning);
        assert_eq!(Verbosity::new(699).level(), LogLevel::Debug);
    }

    #[test]
    fn given_out_of_range_when_mapping_then_clamped_to_ends() {
        assert_eq!(Verbosity::new(-5).level_filter(), LevelFilter::OFF);
        assert_eq!(Verbosity::new(i64::MIN).level_filter(), LevelFilter::OFF);
        assert_eq!(Verbosity::new(701).level_filter(), LevelFilter::TRACE);
        assert_eq!(Verbosity::new(i64::MAX).level_filter(), LevelFilter::TRACE);
        assert_eq!(Verbosity::new(9000).value(), 9000);
    }

    #[test]
    fn given_pretty_flag_when_mapping_then_format() {
        assert_eq!(LogFormat::from_pretty(true), LogFormat::Pretty);
        assert_eq!(LogFormat::from_pretty(false), LogFormat::Json);
    }

    #[test]
    fn given_empty_config_when_deriving_then_defaults() {
        let settings = RuntimeSettings::from_config(&ResolvedConfig::default());
        assert_eq!(settings.verbosity, Verbosity::new(500));
        assert_eq!(settings.format, LogFormat::Pretty);
    }
}
