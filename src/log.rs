//! Internal logging system for the Nebula VR engine
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Thread-safe global logger with RwLock
//! - File and line information for detailed ERROR logs

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom loggers (file logging, in-memory
/// capture for tests, etc.)
///
/// # Example
///
/// ```no_run
/// use nebula_vr_engine::nebula::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    ///
    /// # Arguments
    ///
    /// * `entry` - The log entry to process
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "nebula::Canvas", "nebula::CanvasManager")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose debug information (typically disabled in release)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (critical issues with file:line details)
    Error,
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        // Format timestamp as YYYY-MM-DD HH:MM:SS.mmm
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        // Color severity string
        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        // Color source
        let source = entry.source.bright_blue();

        // Print with or without file:line
        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp, severity_str, source, entry.message
            );
        }
    }
}

// ===== GLOBAL LOGGER =====

/// Global logger (initialized with DefaultLogger on first use)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Replace the global logger
///
/// All subsequent log macros dispatch to the given logger. Used by
/// applications for file/network logging and by tests for capture.
pub fn set_logger(new_logger: Box<dyn Logger>) {
    if let Ok(mut guard) = logger().write() {
        *guard = new_logger;
    }
}

/// Dispatch a log entry to the global logger (used by the nebula_* macros)
pub fn write(severity: LogSeverity, source: &str, message: String) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: None,
        line: None,
    };
    if let Ok(guard) = logger().read() {
        guard.log(&entry);
    }
}

/// Dispatch a detailed log entry with file:line (used by `nebula_error!`)
pub fn write_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: Some(file),
        line: Some(line),
    };
    if let Ok(guard) = logger().read() {
        guard.log(&entry);
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::nebula_trace;
/// nebula_trace!("nebula::Canvas", "Entering resolve()");
/// ```
#[macro_export]
macro_rules! nebula_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::write(
            $crate::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::nebula_debug;
/// # let count = 4;
/// nebula_debug!("nebula::Canvas", "Allocated {} attachments", count);
/// ```
#[macro_export]
macro_rules! nebula_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::write(
            $crate::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::nebula_info;
/// # let name = "mirror";
/// nebula_info!("nebula::CanvasManager", "Canvas '{}' created", name);
/// ```
#[macro_export]
macro_rules! nebula_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::write(
            $crate::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::nebula_warn;
/// nebula_warn!("nebula::Canvas", "destroy() called twice");
/// ```
#[macro_export]
macro_rules! nebula_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::write(
            $crate::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::nebula_error;
/// # let error = "device lost";
/// nebula_error!("nebula::Canvas", "Allocation failed: {}", error);
/// ```
#[macro_export]
macro_rules! nebula_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::write_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR message and return `Err(Error::BackendError(...))`
///
/// # Example
///
/// ```no_run
/// # use nebula_vr_engine::{nebula_bail, nebula::Result};
/// # fn create(name: &str) -> Result<()> {
/// nebula_bail!("nebula::CanvasManager", "Canvas '{}' already exists", name);
/// # }
/// ```
#[macro_export]
macro_rules! nebula_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::nebula_error!($source, "{}", message);
        return Err($crate::nebula::Error::BackendError(message));
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
