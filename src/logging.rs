/// Structured logging for the water-quality monitoring service.
///
/// Provides context-rich logging with component identifiers, timestamps,
/// and severity levels. Supports both console output and file-based
/// logging for daemon operations.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::{ModelError, Provenance};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Model,
    Store,
    Ingest,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Model => write!(f, "MODEL"),
            Component::Store => write!(f, "STORE"),
            Component::Ingest => write!(f, "INGEST"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the model server may simply not be running; the
    /// pipeline degrades to the fallback estimator
    Expected,
    /// Unexpected failure - indicates service degradation or schema drift
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, component: &Component, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, component, context_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info => println!("{}", log_entry),
                LogLevel::Debug => println!("[DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, context_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(component: Component, context: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &component, context, message);
    }
}

/// Log a warning message
pub fn warn(component: Component, context: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &component, context, message);
    }
}

/// Log an error message
pub fn error(component: Component, context: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &component, context, message);
    }
}

/// Log a debug message
pub fn debug(component: Component, context: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &component, context, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a model service failure.
///
/// Transport failures (refused connection, timeout budget breach) are the
/// normal signal that the ML server is not running — the pipeline is built
/// to absorb them. Parse failures mean the server responded with a body we
/// no longer understand, which points at schema drift.
pub fn classify_model_failure(err: &ModelError) -> FailureType {
    match err {
        ModelError::Transport(_) => FailureType::Expected,
        ModelError::Parse(_) => FailureType::Unexpected,
        ModelError::Http(code) if *code >= 500 => FailureType::Unknown,
        ModelError::Http(_) => FailureType::Unexpected,
    }
}

/// Log a model service failure with automatic classification.
pub fn log_model_failure(operation: &str, err: &ModelError) {
    let failure_type = classify_model_failure(err);

    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(Component::Model, None, &message),
        FailureType::Unexpected => error(Component::Model, None, &message),
        FailureType::Unknown => warn(Component::Model, None, &message),
    }
}

// ---------------------------------------------------------------------------
// Poll Cycle Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one polling cycle.
pub fn log_poll_summary(provenance: Provenance, alert_count: usize, quality_score: f64) {
    let message = format!(
        "Prediction cycle complete: provenance={}, score={:.1}, {} alert(s)",
        provenance, quality_score, alert_count
    );

    if alert_count == 0 {
        info(Component::System, None, &message);
    } else {
        warn(Component::System, None, &message);
    }
}
