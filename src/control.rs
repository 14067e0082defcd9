//! Blocking control trait and the command-line implementation.
//!
//! Provides abstraction over the ad blocker to enable:
//! - Testing with mock controls
//! - Driving any utility with an enable/disable/status interface

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::config::ControlSettings;
use crate::error::CommandError;
use crate::state::BlockingState;

/// Trait for querying and switching the ad blocker.
pub trait BlockingControl: Send + Sync + Clone + 'static {
    /// Ask the blocker whether blocking is currently enabled.
    fn query_blocking_state(
        &self,
    ) -> impl Future<Output = Result<BlockingState, CommandError>> + Send;

    /// Switch blocking on or off.
    fn set_blocking_state(
        &self,
        state: BlockingState,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;
}

/// Controls the blocker by running its command-line utility (`pihole`).
///
/// Every invocation is bounded by a timeout; a process still running at the
/// deadline is killed.
#[derive(Debug, Clone)]
pub struct PiholeCli {
    program: String,
    status_args: Vec<String>,
    enable_args: Vec<String>,
    disable_args: Vec<String>,
    enabled_marker: String,
    disabled_marker: String,
    timeout: Duration,
}

impl PiholeCli {
    /// Create a controller from the `[control]` configuration section.
    #[must_use]
    pub fn new(settings: &ControlSettings) -> Self {
        Self {
            program: settings.program.clone(),
            status_args: settings.status_args.clone(),
            enable_args: settings.enable_args.clone(),
            disable_args: settings.disable_args.clone(),
            enabled_marker: settings.enabled_marker.to_lowercase(),
            disabled_marker: settings.disabled_marker.to_lowercase(),
            timeout: settings.timeout(),
        }
    }

    /// Run the program with `args` and return its stdout on exit code 0.
    async fn run(&self, args: &[String]) -> Result<String, CommandError> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| CommandError::Timeout {
                program: self.program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(program = %self.program, stderr = %stderr.trim(), "command failed");
            return Err(CommandError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Interpret status output by looking for exactly one of the markers.
    fn parse_status(&self, output: &str) -> Result<BlockingState, CommandError> {
        let lowered = output.to_lowercase();
        let enabled = lowered.contains(&self.enabled_marker);
        let disabled = lowered.contains(&self.disabled_marker);

        match (enabled, disabled) {
            (true, false) => Ok(BlockingState::Enabled),
            (false, true) => Ok(BlockingState::Disabled),
            _ => Err(CommandError::Unparseable {
                output: output.trim().to_string(),
            }),
        }
    }
}

impl BlockingControl for PiholeCli {
    #[instrument(skip(self))]
    async fn query_blocking_state(&self) -> Result<BlockingState, CommandError> {
        let output = self.run(&self.status_args).await?;
        self.parse_status(&output)
    }

    #[instrument(skip(self))]
    async fn set_blocking_state(&self, state: BlockingState) -> Result<(), CommandError> {
        let args = match state {
            BlockingState::Enabled => &self.enable_args,
            BlockingState::Disabled => &self.disable_args,
        };
        self.run(args).await.map(|_| ())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Mock blocker holding its state in memory.
    ///
    /// Counts calls and can be told to fail or stall queries or toggles.
    #[derive(Clone)]
    pub struct MockControl {
        pub state: Arc<Mutex<BlockingState>>,
        pub set_calls: Arc<Mutex<Vec<BlockingState>>>,
        pub query_count: Arc<AtomicU64>,
        pub fail_query: Arc<Mutex<bool>>,
        pub fail_set: Arc<Mutex<bool>>,
        pub query_delay: Arc<Mutex<Duration>>,
        pub set_delay: Arc<Mutex<Duration>>,
    }

    impl MockControl {
        pub fn new(state: BlockingState) -> Self {
            Self {
                state: Arc::new(Mutex::new(state)),
                set_calls: Arc::default(),
                query_count: Arc::default(),
                fail_query: Arc::default(),
                fail_set: Arc::default(),
                query_delay: Arc::default(),
                set_delay: Arc::default(),
            }
        }

        /// Change the state behind the controller's back.
        pub fn set_out_of_band(&self, state: BlockingState) {
            *self.state.lock() = state;
        }

        pub fn state(&self) -> BlockingState {
            *self.state.lock()
        }

        pub fn set_calls(&self) -> Vec<BlockingState> {
            self.set_calls.lock().clone()
        }

        pub fn query_count(&self) -> u64 {
            self.query_count.load(Ordering::SeqCst)
        }

        pub fn fail_queries(&self, fail: bool) {
            *self.fail_query.lock() = fail;
        }

        pub fn fail_sets(&self, fail: bool) {
            *self.fail_set.lock() = fail;
        }

        /// Make every query take `delay` before answering.
        pub fn delay_queries(&self, delay: Duration) {
            *self.query_delay.lock() = delay;
        }

        /// Make every toggle take `delay` before it lands.
        pub fn delay_sets(&self, delay: Duration) {
            *self.set_delay.lock() = delay;
        }
    }

    impl BlockingControl for MockControl {
        async fn query_blocking_state(&self) -> Result<BlockingState, CommandError> {
            self.query_count.fetch_add(1, Ordering::SeqCst);
            let delay = *self.query_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if *self.fail_query.lock() {
                return Err(CommandError::Unparseable {
                    output: "mock failure".into(),
                });
            }
            Ok(*self.state.lock())
        }

        async fn set_blocking_state(&self, state: BlockingState) -> Result<(), CommandError> {
            self.set_calls.lock().push(state);
            let delay = *self.set_delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if *self.fail_set.lock() {
                return Err(CommandError::Failed {
                    program: "mock".into(),
                    status: "exit status: 1".into(),
                });
            }
            *self.state.lock() = state;
            Ok(())
        }
    }

    fn shell(script: &str, timeout_secs: u64) -> PiholeCli {
        PiholeCli::new(&ControlSettings {
            program: "sh".into(),
            status_args: vec!["-c".into(), script.into()],
            enable_args: vec!["-c".into(), "exit 0".into()],
            disable_args: vec!["-c".into(), "exit 3".into()],
            timeout_secs,
            ..ControlSettings::default()
        })
    }

    #[test]
    fn should_parse_status_markers() {
        let cli = PiholeCli::new(&ControlSettings::default());

        assert_eq!(
            cli.parse_status("  [✓] Pi-hole blocking is enabled\n").unwrap(),
            BlockingState::Enabled
        );
        assert_eq!(
            cli.parse_status("  [✗] Pi-hole blocking is Disabled\n").unwrap(),
            BlockingState::Disabled
        );
        assert_eq!(
            cli.parse_status("Enabled").unwrap(),
            BlockingState::Enabled
        );
    }

    #[test]
    fn should_reject_ambiguous_or_missing_markers() {
        let cli = PiholeCli::new(&ControlSettings::default());

        assert!(matches!(
            cli.parse_status("[✗] DNS service is NOT running"),
            Err(CommandError::Unparseable { .. })
        ));
        assert!(matches!(
            cli.parse_status("enabled\ndisabled"),
            Err(CommandError::Unparseable { .. })
        ));
    }

    #[tokio::test]
    async fn should_query_state_from_command_output() {
        let cli = shell("echo 'Pi-hole blocking is disabled'", 5);
        assert_eq!(
            cli.query_blocking_state().await.unwrap(),
            BlockingState::Disabled
        );
    }

    #[tokio::test]
    async fn should_fail_query_on_nonzero_exit() {
        let cli = shell("echo enabled; exit 1", 5);
        assert!(matches!(
            cli.query_blocking_state().await,
            Err(CommandError::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn should_report_toggle_exit_code() {
        let cli = shell("true", 5);
        assert!(cli.set_blocking_state(BlockingState::Enabled).await.is_ok());
        assert!(matches!(
            cli.set_blocking_state(BlockingState::Disabled).await,
            Err(CommandError::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn should_time_out_hung_command() {
        let cli = shell("sleep 30", 1);
        let started = std::time::Instant::now();

        assert!(matches!(
            cli.query_blocking_state().await,
            Err(CommandError::Timeout { .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn should_fail_when_program_missing() {
        let cli = PiholeCli::new(&ControlSettings {
            program: "/nonexistent/pihole".into(),
            ..ControlSettings::default()
        });

        assert!(matches!(
            cli.query_blocking_state().await,
            Err(CommandError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn should_track_mock_calls() {
        let control = MockControl::new(BlockingState::Disabled);

        control
            .set_blocking_state(BlockingState::Enabled)
            .await
            .unwrap();
        assert_eq!(control.state(), BlockingState::Enabled);
        assert_eq!(control.set_calls(), [BlockingState::Enabled]);

        control.fail_queries(true);
        assert!(control.query_blocking_state().await.is_err());
        assert_eq!(control.query_count(), 1);
    }
}
