//! Logger trait used by resolution sessions

use std::sync::Arc;

/// Sink for the resolution log
///
/// A session reports which source each parameter came from at debug level,
/// a one-line summary at info level and soft failures (an unreachable secret
/// backend, an environment value that did not parse) at warn level. Secret
/// values are never passed to a logger.
///
/// Implementations:
/// - `NoOpLogger`: the session default
/// - `ConsoleLogger`: writes to stderr, debug lines only when verbose
/// - `MemoryLogger`: captures lines for assertions
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Logger shared between a session and its host
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macros for logging
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use crate::{log_debug, log_error, log_info, log_warn};

    #[test]
    fn test_macros_format_through_shared_logger() {
        let memory = Arc::new(MemoryLogger::new());
        let logger: SharedLogger = memory.clone();

        log_debug!(logger, "{} resolved from {}", "PORT", "environment");
        log_info!(logger, "Resolved {} parameters (stage: {})", 3, "prod");
        log_warn!(logger, "Secret backend unavailable for region {}", "eu-west-1");
        log_error!(logger, "missing required parameters: {}", "HOST");

        assert_eq!(memory.messages("debug"), vec!["PORT resolved from environment"]);
        assert_eq!(memory.messages("info"), vec!["Resolved 3 parameters (stage: prod)"]);
        assert_eq!(memory.messages("warn"), vec!["Secret backend unavailable for region eu-west-1"]);
        assert_eq!(memory.messages("error"), vec!["missing required parameters: HOST"]);
    }
}
