//! GPIO pin abstractions and the Raspberry Pi implementation.
//!
//! The watcher and the LED only see the [`InputPin`] and [`OutputPin`]
//! traits, so the control logic runs against mock pins in tests.

use rppal::gpio::{Gpio, Level};

use crate::config::Config;
use crate::error::GpioError;

/// Digital input the push button is wired to.
pub trait InputPin: Send + 'static {
    /// Instantaneous level, `true` meaning the button is pressed.
    fn read_input_pin(&mut self) -> Result<bool, GpioError>;
}

/// Digital output driving the status LED.
pub trait OutputPin: Send + 'static {
    /// Drive the pin high (`true`) or low (`false`).
    fn write_output_pin(&mut self, high: bool) -> Result<(), GpioError>;
}

/// Push button on a Raspberry Pi GPIO line.
#[derive(Debug)]
pub struct RppalInput {
    pin: rppal::gpio::InputPin,
    active_low: bool,
}

impl InputPin for RppalInput {
    fn read_input_pin(&mut self) -> Result<bool, GpioError> {
        let level = self.pin.read();
        Ok((level == Level::Low) == self.active_low)
    }
}

/// Status LED on a Raspberry Pi GPIO line.
#[derive(Debug)]
pub struct RppalOutput {
    pin: rppal::gpio::OutputPin,
}

impl OutputPin for RppalOutput {
    fn write_output_pin(&mut self, high: bool) -> Result<(), GpioError> {
        self.pin.write(Level::from(high));
        Ok(())
    }
}

/// Claim the button and LED pins described by the configuration.
///
/// Both pins go back to their previous mode when the returned values are
/// dropped, which is how they get released on shutdown.
pub fn claim(config: &Config) -> Result<(RppalInput, RppalOutput), GpioError> {
    let claim_error = |pin: u8| {
        move |err: rppal::gpio::Error| GpioError::Claim {
            pin,
            reason: err.to_string(),
        }
    };

    let gpio = Gpio::new().map_err(claim_error(config.button.pin))?;

    let button = gpio
        .get(config.button.pin)
        .map_err(claim_error(config.button.pin))?;
    let button = if config.button.active_low {
        button.into_input_pullup()
    } else {
        button.into_input_pulldown()
    };

    let led = gpio
        .get(config.led.pin)
        .map_err(claim_error(config.led.pin))?
        .into_output_low();

    Ok((
        RppalInput {
            pin: button,
            active_low: config.button.active_low,
        },
        RppalOutput { pin: led },
    ))
}
