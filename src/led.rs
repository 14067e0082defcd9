//! Status LED shared by the input watcher and the reconciler.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::GpioError;
use crate::gpio::OutputPin;
use crate::state::{BlockingState, LedState};

/// LED handle shared between the two loops. The mutex serializes writes.
pub type SharedLed<O> = Arc<Mutex<StatusLed<O>>>;

/// Tracks the logical LED state and drives the output pin.
pub struct StatusLed<O: OutputPin> {
    pin: O,
    inverted: bool,
    state: Option<LedState>,
}

impl<O: OutputPin> StatusLed<O> {
    /// Wrap an output pin. With `inverted` the LED is lit for [`LedState::Off`].
    pub const fn new(pin: O, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            state: None,
        }
    }

    /// Wrap an output pin into a [`SharedLed`].
    pub fn shared(pin: O, inverted: bool) -> SharedLed<O> {
        Arc::new(Mutex::new(Self::new(pin, inverted)))
    }

    /// Last state successfully written, `None` before the first write.
    pub const fn state(&self) -> Option<LedState> {
        self.state
    }

    /// Drive the LED to `state`.
    ///
    /// Returns `Ok(false)` without touching the pin when the LED already
    /// shows `state`. A failed write leaves the remembered state unchanged.
    pub fn set(&mut self, state: LedState) -> Result<bool, GpioError> {
        if self.state == Some(state) {
            return Ok(false);
        }

        let high = (state == LedState::On) != self.inverted;
        self.pin.write_output_pin(high)?;
        debug!(led = %state, high, "status LED updated");
        self.state = Some(state);
        Ok(true)
    }

    /// Drive the LED to mirror a blocking state.
    pub fn show(&mut self, state: BlockingState) -> Result<bool, GpioError> {
        self.set(LedState::from(state))
    }
}
