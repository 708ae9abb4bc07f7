//! Logging abstractions for runtime-agnostic logging

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{LogLine, MemoryLogger};
