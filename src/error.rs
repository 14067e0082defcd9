//! Error types for blockswitch.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for blockswitch operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("command error: {0}")]
    Command(#[from] CommandError),

    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Validation errors for configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input.sample_interval_ms must be greater than 0")]
    ZeroSampleInterval,

    #[error("input.debounce_samples must be greater than 0")]
    ZeroDebounceSamples,

    #[error("reconcile.poll_interval_secs must be greater than 0")]
    ZeroPollInterval,

    #[error("control.timeout_secs must be greater than 0")]
    ZeroCommandTimeout,

    #[error("control.program cannot be empty")]
    EmptyProgram,

    #[error("control.{field} cannot be empty")]
    EmptyMarker { field: &'static str },

    #[error("button and LED cannot share GPIO pin {pin}")]
    SharedPin { pin: u8 },
}

/// Failures of the external blocking utility.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program:?} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("{program:?} exited with {status}")]
    Failed { program: String, status: String },

    #[error("unexpected status output: {output:?}")]
    Unparseable { output: String },
}

/// GPIO pin failures.
#[derive(Debug, Error)]
pub enum GpioError {
    #[error("failed to claim GPIO pin {pin}: {reason}")]
    Claim { pin: u8, reason: String },

    #[error("failed to read GPIO pin {pin}: {reason}")]
    Read { pin: u8, reason: String },

    #[error("failed to write GPIO pin {pin}: {reason}")]
    Write { pin: u8, reason: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
