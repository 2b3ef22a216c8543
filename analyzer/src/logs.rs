//! Pipeline status logging.
//!
//! Stage progress is reported through `tracing` so it lands on stderr,
//! keeping stdout for the report tables. The subscriber is installed by the
//! binary; library callers that install none simply get no output.

use tracing::{debug, info, warn};

/// Log level for pipeline status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Detail,
}

/// A single status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Nesting depth under the current stage
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn detail(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Detail, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Message with its level marker and indentation applied.
    pub fn formatted(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info | LogLevel::Detail => "",
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
        };
        format!("{}{}{}", "   ".repeat(self.indent as usize), prefix, self.message)
    }

    /// Emit the entry as a tracing event.
    pub fn emit(&self) {
        let line = self.formatted();
        match self.level {
            LogLevel::Info | LogLevel::Success => info!("{}", line),
            LogLevel::Warning => warn!("{}", line),
            LogLevel::Detail => debug!("{}", line),
        }
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_detail(msg: impl Into<String>) {
    LogEntry::detail(msg).with_indent(1).emit();
}
