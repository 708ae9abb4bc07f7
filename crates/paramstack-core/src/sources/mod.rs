//! Command-line and environment sources
//!
//! The resolution engine only needs two capabilities from the outside world:
//! - `ArgumentSource`: the raw value of a flag, if it was explicitly supplied
//! - `EnvironmentSource`: the raw value of an environment variable, if non-empty
//!
//! Built-in implementations cover the process environment, clap argument
//! matches and in-memory maps for tests and embedding.

mod args;
mod env;
mod clap_args;

pub use args::{MapArguments, NoArguments};
pub use env::{MapEnvironment, ProcessEnvironment};
pub use clap_args::{command_for, ClapArguments};

/// Access to explicitly supplied command-line values
pub trait ArgumentSource: Send + Sync {
    /// Raw value of the argument named `name`
    ///
    /// Returns `None` unless the argument was explicitly supplied; a flag that
    /// merely carries its default must not be reported.
    fn explicit_value(&self, name: &str) -> Option<String>;
}

/// Access to environment variables by exact name
pub trait EnvironmentSource: Send + Sync {
    /// Raw value of the variable named `name`; empty values count as absent
    fn var(&self, name: &str) -> Option<String>;
}
