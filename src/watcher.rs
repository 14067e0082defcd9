//! Push button watcher.
//!
//! Samples the button at a fixed cadence, debounces the samples and toggles
//! the ad blocker on every accepted press.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::control::BlockingControl;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::gpio::{InputPin, OutputPin};
use crate::led::SharedLed;
use crate::service::{ShutdownSignal, stop_requested};
use crate::state::{BlockingState, ButtonEvent};

/// Watches the push button and toggles blocking on each press.
pub struct InputWatcher<I, C, O>
where
    I: InputPin,
    C: BlockingControl,
    O: OutputPin,
{
    input: I,
    debouncer: Debouncer,
    control: C,
    led: SharedLed<O>,
}

impl<I, C, O> InputWatcher<I, C, O>
where
    I: InputPin,
    C: BlockingControl,
    O: OutputPin,
{
    /// Create a watcher accepting a press after `debounce_samples`
    /// consecutive pressed readings.
    pub fn new(input: I, debounce_samples: u8, control: C, led: SharedLed<O>) -> Self {
        Self {
            input,
            debouncer: Debouncer::new(debounce_samples),
            control,
            led,
        }
    }

    /// Take one button sample.
    ///
    /// On an accepted press the toggle runs to completion before this
    /// returns, so presses made meanwhile are never sampled. Returns the new
    /// blocking state when a toggle succeeded.
    pub async fn tick(&mut self) -> Result<Option<BlockingState>> {
        let pressed = self.input.read_input_pin()?;

        match self.debouncer.sample(pressed) {
            ButtonEvent::Pressed => {
                debug!("button pressed");
                self.toggle().await.map(Some)
            }
            ButtonEvent::Released => {
                debug!("button released");
                Ok(None)
            }
            ButtonEvent::None => Ok(None),
        }
    }

    /// Switch blocking to the opposite of its current state and show the
    /// result on the LED right away.
    ///
    /// The LED is left untouched when the query or the toggle fails.
    pub async fn toggle(&mut self) -> Result<BlockingState> {
        let current = self.control.query_blocking_state().await?;
        let target = current.opposite();

        if target == BlockingState::Enabled {
            info!("Enabling ad blocking");
        } else {
            info!("Disabling ad blocking");
        }

        self.control.set_blocking_state(target).await?;
        self.led.lock().show(target)?;
        Ok(target)
    }

    /// Sample the button every `interval` until shutdown is requested.
    ///
    /// Errors are logged and never stop the loop. A toggle still in flight
    /// when shutdown is requested is abandoned, which kills its command.
    pub async fn run(mut self, interval: Duration, mut shutdown: ShutdownSignal) {
        debug!(
            ?interval,
            debounce_samples = self.debouncer.threshold(),
            "starting push button watcher"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = stop_requested(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                () = stop_requested(&mut shutdown) => {
                    debug!("abandoning push button handling for shutdown");
                    break;
                }
                result = self.tick() => {
                    if let Err(err) = result {
                        warn!("Push button handling failed: {err}");
                    }
                }
            }
        }

        debug!("push button watcher stopped");
    }
}
