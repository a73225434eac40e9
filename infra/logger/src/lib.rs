//! # Logger
//!
//! Installs the global `tracing` subscriber for the workspace binaries.
//!
//! The console layer writes to **stderr** so that the portal can keep stdout for rendered
//! screens. An optional rolling file layer (plain or JSON) is added when a directory is
//! configured. `RUST_LOG` refines the configured default level.
//!
//! ```rust
//! # use ctn_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("ctn-portal")
//!     .level(LevelFilter::WARN)
//!     .init();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

/// Parses a level name from configuration (`"info"`, `"debug"`, `"off"`, ...).
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown level names.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LoggerError> {
    raw.trim().parse::<LevelFilter>().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("unknown log level '{raw}'").into(),
        context: Some("expected trace, debug, info, warn, error or off".into()),
    })
}

#[derive(Debug, Clone)]
struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

#[derive(Debug, Default)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}

/// Builder for the global subscriber. A name is required before [`LoggerBuilder::init`].
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = Unnamed> {
    name: N,
    level: LevelFilter,
    env_filter: Option<String>,
    console: bool,
    file: Option<FileSink>,
}

impl LoggerBuilder<Unnamed> {
    /// Names the logger; the name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named> {
        LoggerBuilder {
            name: Named(name.into()),
            level: self.level,
            env_filter: self.env_filter,
            console: self.console,
            file: self.file,
        }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    #[must_use = "The builder must be initialized with .init()"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Programmatic filter directives (e.g. `ctn_kernel=debug,reqwest=warn`).
    #[must_use = "The builder must be initialized with .init()"]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.env_filter = Some(directives.into());
        self
    }

    #[must_use = "The builder must be initialized with .init()"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Adds a daily rolling file sink in `directory`.
    #[must_use = "The builder must be initialized with .init()"]
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSink {
            directory: directory.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Rotation strategy of the file sink. No-op without [`LoggerBuilder::directory`].
    #[must_use = "The builder must be initialized with .init()"]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.rotation = rotation;
        }
        self
    }

    #[must_use = "The builder must be initialized with .init()"]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.max_files = max;
        }
        self
    }

    /// Writes the file sink as JSON lines.
    #[must_use = "The builder must be initialized with .init()"]
    pub fn json(mut self, enabled: bool) -> Self {
        if let Some(file) = self.file.as_mut() {
            file.json = enabled;
        }
        self
    }
}

impl LoggerBuilder<Named> {
    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file writer guard; keep it alive until shutdown so
    /// buffered lines are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`]: empty name, zero `max_files`, bad filter, or
    ///   no sink enabled.
    /// * [`LoggerError::Appender`]: the log directory cannot be used.
    /// * [`LoggerError::Subscriber`]: a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0.trim().to_owned();
        if name.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }

        let filter = self.build_filter()?;
        let mut layers = Vec::new();

        if self.console {
            layers.push(fmt::layer().compact().with_writer(std::io::stderr).with_target(false).boxed());
        }

        let guard = match &self.file {
            Some(sink) => {
                if sink.max_files == 0 {
                    return Err(LoggerError::InvalidConfiguration {
                        message: "max_files must be greater than zero".into(),
                        context: None,
                    });
                }

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation.clone())
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.directory)
                    .context(format!("Log directory {}", sink.directory.display()))?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let layer = fmt::layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { layer.json().boxed() } else { layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging sink enabled; enable the console or set a directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, file = self.file.is_some(), "Logging initialized");

        Ok(Logger { guard })
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{directives}': {e}").into(),
                    context: None,
                })
            },
            None => Ok(builder.from_env_lossy()),
        }
    }
}

/// Handle to the installed logging system.
#[must_use = "Dropping this handle stops the background file writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be initialized with .init()"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: Unnamed,
            level: LevelFilter::INFO,
            env_filter: None,
            console: true,
            file: None,
        }
    }

    /// Whether a file sink (and its writer thread) is active.
    #[must_use]
    pub const fn has_file_sink(&self) -> bool {
        self.guard.is_some()
    }
}
