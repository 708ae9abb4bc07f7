//! Capturing logger

use parking_lot::Mutex;

use super::traits::Logger;

/// One captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: &'static str,
    pub message: String,
}

/// A logger that keeps every line in memory
///
/// Useful in tests and for hosts that forward resolution logs elsewhere
/// after the fact.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<LogLine>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().clone()
    }

    /// Messages logged at `level` ("debug", "info", "warn" or "error")
    pub fn messages(&self, level: &str) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|line| line.level == level)
            .map(|line| line.message.clone())
            .collect()
    }

    fn push(&self, level: &'static str, message: &str) {
        self.lines.lock().push(LogLine {
            level,
            message: message.to_string(),
        });
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push("debug", message);
    }

    fn info(&self, message: &str) {
        self.push("info", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, message: &str) {
        self.push("error", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_captures_levels() {
        let logger = MemoryLogger::new();
        crate::log_info!(logger, "resolved {}", "PORT");
        crate::log_warn!(logger, "fell through");

        assert_eq!(logger.lines().len(), 2);
        assert_eq!(logger.messages("info"), vec!["resolved PORT".to_string()]);
        assert_eq!(logger.messages("warn"), vec!["fell through".to_string()]);
        assert!(logger.messages("error").is_empty());
    }
}
