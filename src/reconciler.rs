//! Background reconciliation of the LED with the blocker's actual state.
//!
//! Blocking can be switched without the button (web interface, `pihole`
//! CLI), so the LED is periodically corrected from a fresh status query.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::control::BlockingControl;
use crate::error::Result;
use crate::gpio::OutputPin;
use crate::led::SharedLed;
use crate::service::{ShutdownSignal, stop_requested};
use crate::state::BlockingState;

/// Polls the blocker and keeps the LED in sync.
pub struct StateReconciler<C, O>
where
    C: BlockingControl,
    O: OutputPin,
{
    control: C,
    led: SharedLed<O>,
    last_seen: Option<BlockingState>,
}

impl<C, O> StateReconciler<C, O>
where
    C: BlockingControl,
    O: OutputPin,
{
    pub const fn new(control: C, led: SharedLed<O>) -> Self {
        Self {
            control,
            led,
            last_seen: None,
        }
    }

    #[cfg(test)]
    const fn last_seen(&self) -> Option<BlockingState> {
        self.last_seen
    }

    /// Query the blocker once and drive the LED to match.
    ///
    /// On a failed query the LED keeps its last value.
    pub async fn poll(&mut self) -> Result<BlockingState> {
        let state = self.control.query_blocking_state().await?;

        match self.last_seen {
            None => info!("Ad blocking state: {state}"),
            Some(previous) if previous != state => {
                info!(%previous, "Ad blocking state changed to: {state}");
            }
            Some(_) => debug!(%state, "ad blocking state unchanged"),
        }
        self.last_seen = Some(state);

        self.led.lock().show(state)?;
        Ok(state)
    }

    /// Poll every `interval` until shutdown is requested. The first poll
    /// happens immediately.
    ///
    /// Failures are logged and retried on the next tick. A poll still in
    /// flight when shutdown is requested is abandoned.
    pub async fn run(mut self, interval: Duration, mut shutdown: ShutdownSignal) {
        debug!(?interval, "starting ad blocking state monitor");

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
                    debug!("abandoning ad blocking state refresh for shutdown");
                    break;
                }
                result = self.poll() => {
                    if let Err(err) = result {
                        warn!("Failed to refresh ad blocking state: {err}");
                    }
                }
            }
        }

        debug!(last_seen = ?self.last_seen, "ad blocking state monitor stopped");
    }
}
