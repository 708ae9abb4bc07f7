//! Silent logger

use super::traits::Logger;

/// Discards every line
///
/// Sessions start with this logger, so embedding the resolver in a service
/// produces no output until the host installs its own with `with_logger`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
