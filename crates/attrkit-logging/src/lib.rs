//! Subscriber setup for attrkit's `tracing` events
//!
//! The engine crates only emit events: `trace` on supertype fallback and
//! lazy evaluation, `debug` on rejected block assignments and failed
//! coercions. Binaries and test suites install a subscriber here to see
//! them.
//!
//! ```ignore
//! use attrkit_logging::{AttrkitSubscriberBuilder, ConsoleFormat, LogFile};
//!
//! let _guard = AttrkitSubscriberBuilder::new()
//!     .with_console(Some(ConsoleFormat::Pretty))
//!     .with_target("attrkit_core", "trace")
//!     .with_file(LogFile::new("logs", "attrkit"))
//!     .try_init()?;
//! ```

pub mod config;

pub use config::{ConsoleFormat, FileRolling, LogConfig, LogFile};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Failure to install the global subscriber
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid filter directives {directives:?}: {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("Cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot start rolling log file: {0}")]
    Rolling(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Fluent construction of the attrkit subscriber
#[derive(Debug, Clone, Default)]
pub struct AttrkitSubscriberBuilder {
    config: LogConfig,
}

impl AttrkitSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>, level: impl Into<String>) -> Self {
        self.config = self.config.with_target(target, level);
        self
    }

    /// Pick the console format; `None` turns console output off
    pub fn with_console(mut self, format: Option<ConsoleFormat>) -> Self {
        self.config.console = format;
        self
    }

    pub fn with_file(mut self, file: LogFile) -> Self {
        self.config.file = Some(file);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally
    ///
    /// With a file sink, the returned guard flushes buffered lines when
    /// dropped and must outlive the logging it covers.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogError> {
        let filter = self.filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if let Some(format) = self.config.console {
            layers.push(console_layer(format));
        }

        let mut guard = None;
        if let Some(file) = &self.config.file {
            let (writer, file_guard) = open_file(file)?;
            layers.push(json_layer(writer));
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }

    fn filter(&self) -> Result<EnvFilter, LogError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let directives = self.config.directives();
        EnvFilter::try_new(&directives).map_err(|e| LogError::InvalidFilter {
            directives,
            reason: e.to_string(),
        })
    }
}

fn console_layer(format: ConsoleFormat) -> BoxedLayer {
    match format {
        ConsoleFormat::Json => json_layer(std::io::stdout),
        ConsoleFormat::Pretty => fmt::layer().with_target(true).boxed(),
        ConsoleFormat::Captured => fmt::layer().with_ansi(false).with_test_writer().boxed(),
    }
}

fn json_layer<W>(writer: W) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(writer)
        .boxed()
}

fn open_file(file: &LogFile) -> Result<(NonBlocking, WorkerGuard), LogError> {
    fs::create_dir_all(&file.directory)?;
    match file.rolling {
        FileRolling::Never => Ok(tracing_appender::non_blocking(File::create(file.path())?)),
        FileRolling::Daily => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(file.name.as_str())
                .filename_suffix("log")
                .build(&file.directory)
                .map_err(|e| LogError::Rolling(e.to_string()))?;
            Ok(tracing_appender::non_blocking(appender))
        }
    }
}

/// Install the [`LogConfig::testing`] subscriber
///
/// Every test may call this; only the first call in a process installs.
pub fn init_testing() {
    let _ = AttrkitSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
