//! Configuration loading and validation.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result, ValidationError};

/// Config file read when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/blockswitch.toml";

/// Main configuration for the button controller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Push button input.
    #[serde(default)]
    pub button: ButtonSettings,

    /// Status LED output.
    #[serde(default)]
    pub led: LedSettings,

    /// Button sampling and debouncing.
    #[serde(default)]
    pub input: InputSettings,

    /// Background state polling.
    #[serde(default)]
    pub reconcile: ReconcileSettings,

    /// External blocking utility invocation.
    #[serde(default)]
    pub control: ControlSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonSettings {
    /// BCM GPIO number of the push button.
    #[serde(default = "default_button_pin")]
    pub pin: u8,

    /// The button pulls the pin to ground when pressed.
    /// The internal pull-up is enabled in that case.
    #[serde(default = "default_true")]
    pub active_low: bool,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            pin: default_button_pin(),
            active_low: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedSettings {
    /// BCM GPIO number of the status LED.
    #[serde(default = "default_led_pin")]
    pub pin: u8,

    /// Light the LED while blocking is disabled instead of enabled.
    #[serde(default)]
    pub lit_when_disabled: bool,
}

impl Default for LedSettings {
    fn default() -> Self {
        Self {
            pin: default_led_pin(),
            lit_when_disabled: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSettings {
    /// Interval between two button samples, in milliseconds.
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,

    /// Consecutive identical samples needed to accept a press or a release.
    #[serde(default = "default_debounce_samples")]
    pub debounce_samples: u8,
}

impl InputSettings {
    #[must_use]
    pub const fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval(),
            debounce_samples: default_debounce_samples(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileSettings {
    /// Interval between two state polls, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl ReconcileSettings {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlSettings {
    /// Program controlling the ad blocker, looked up in `PATH`.
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_status_args")]
    pub status_args: Vec<String>,

    #[serde(default = "default_enable_args")]
    pub enable_args: Vec<String>,

    #[serde(default = "default_disable_args")]
    pub disable_args: Vec<String>,

    /// Text in the status output meaning blocking is enabled (case-insensitive).
    #[serde(default = "default_enabled_marker")]
    pub enabled_marker: String,

    /// Text in the status output meaning blocking is disabled (case-insensitive).
    #[serde(default = "default_disabled_marker")]
    pub disabled_marker: String,

    /// Deadline for a single command invocation, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ControlSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            status_args: default_status_args(),
            enable_args: default_enable_args(),
            disable_args: default_disable_args(),
            enabled_marker: default_enabled_marker(),
            disabled_marker: default_disabled_marker(),
            timeout_secs: default_timeout(),
        }
    }
}

// Physical pins 40 and 38 on the 40-pin header.
const fn default_button_pin() -> u8 {
    21
}

const fn default_led_pin() -> u8 {
    20
}

const fn default_true() -> bool {
    true
}

const fn default_sample_interval() -> u64 {
    25
}

const fn default_debounce_samples() -> u8 {
    3
}

const fn default_poll_interval() -> u64 {
    10
}

const fn default_timeout() -> u64 {
    5
}

fn default_program() -> String {
    "pihole".to_string()
}

fn default_status_args() -> Vec<String> {
    vec!["status".to_string()]
}

fn default_enable_args() -> Vec<String> {
    vec!["enable".to_string()]
}

fn default_disable_args() -> Vec<String> {
    vec!["disable".to_string()]
}

fn default_enabled_marker() -> String {
    "enabled".to_string()
}

fn default_disabled_marker() -> String {
    "disabled".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load from `path` if given, else from [`DEFAULT_CONFIG_PATH`] when it
    /// exists, else fall back to the built-in defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.input.sample_interval_ms == 0 {
            return Err(ValidationError::ZeroSampleInterval);
        }

        if self.input.debounce_samples == 0 {
            return Err(ValidationError::ZeroDebounceSamples);
        }

        if self.reconcile.poll_interval_secs == 0 {
            return Err(ValidationError::ZeroPollInterval);
        }

        if self.control.timeout_secs == 0 {
            return Err(ValidationError::ZeroCommandTimeout);
        }

        if self.control.program.trim().is_empty() {
            return Err(ValidationError::EmptyProgram);
        }

        if self.control.enabled_marker.is_empty() {
            return Err(ValidationError::EmptyMarker {
                field: "enabled_marker",
            });
        }

        if self.control.disabled_marker.is_empty() {
            return Err(ValidationError::EmptyMarker {
                field: "disabled_marker",
            });
        }

        if self.button.pin == self.led.pin {
            return Err(ValidationError::SharedPin {
                pin: self.button.pin,
            });
        }

        Ok(())
    }
}
