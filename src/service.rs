//! Service orchestration.
//!
//! Wires the input watcher and the reconciler to shared adapters, runs them
//! as two tokio tasks and stops them on a termination signal.

use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::control::BlockingControl;
use crate::gpio::{InputPin, OutputPin};
use crate::led::StatusLed;
use crate::reconciler::StateReconciler;
use crate::watcher::InputWatcher;

/// Receiving end of a stop request; `true` once stopping.
pub type ShutdownSignal = watch::Receiver<bool>;

/// Resolve once stopping is requested or the requesting side is gone.
pub async fn stop_requested(shutdown: &mut ShutdownSignal) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Handle on the two running loops.
pub struct Service {
    shutdown: watch::Sender<bool>,
    watcher: JoinHandle<()>,
    reconciler: JoinHandle<()>,
}

impl Service {
    /// Spawn the watcher and the reconciler.
    ///
    /// Both loops own a share of the LED; the pins are dropped, and thus
    /// released, once both tasks have finished.
    pub fn start<I, O, C>(config: &Config, input: I, output: O, control: C) -> Self
    where
        I: InputPin,
        O: OutputPin,
        C: BlockingControl,
    {
        let (shutdown, signal) = watch::channel(false);
        let led = StatusLed::shared(output, config.led.lit_when_disabled);

        let watcher = InputWatcher::new(
            input,
            config.input.debounce_samples,
            control.clone(),
            Arc::clone(&led),
        );
        let reconciler = StateReconciler::new(control, led);

        Self {
            watcher: tokio::spawn(watcher.run(config.input.sample_interval(), signal.clone())),
            reconciler: tokio::spawn(reconciler.run(config.reconcile.poll_interval(), signal)),
            shutdown,
        }
    }

    /// Ask both loops to stop and wait for them.
    ///
    /// Loops stop right away, even mid-command; an abandoned command's
    /// process is killed.
    pub async fn stop(self) {
        self.shutdown.send_replace(true);

        if let Err(err) = self.watcher.await {
            error!("Push button task failed: {err}");
        }
        if let Err(err) = self.reconciler.await {
            error!("State monitor task failed: {err}");
        }
    }

    /// Run until SIGINT/SIGTERM, then stop both loops.
    pub async fn wait_for_shutdown(self) -> io::Result<()> {
        let result = termination_signal().await;
        match &result {
            Ok(()) => info!("Termination signal received, shutting down..."),
            Err(err) => error!("Failed to listen for termination signals: {err}"),
        }

        self.stop().await;
        info!("Shutdown complete.");
        result
    }
}

#[cfg(unix)]
async fn termination_signal() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn termination_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
