//! blockswitch - Entry point.
//!
//! Enables and disables Pi-hole with a physical push button and shows the
//! current blocking state with an LED.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use blockswitch::config::Config;
use blockswitch::control::PiholeCli;
use blockswitch::logging::{self, LogLevel};
use blockswitch::service::Service;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Pi-hole control button handler",
    long_about = "Enables and disables Pi-hole with a physical push button and shows the current state with a LED"
)]
struct Args {
    /// Logging level.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

async fn run(args: Args) -> Result<()> {
    let config_path = std::env::var_os("CONFIG_PATH").map(PathBuf::from);
    let config =
        Config::discover(config_path.as_deref()).context("Failed to load configuration")?;

    info!("Starting Pi-hole control button handler");
    info!(
        "Button on GPIO {}, LED on GPIO {}",
        config.button.pin, config.led.pin
    );
    info!(
        "Sampling every {:?}, state poll every {:?}",
        config.input.sample_interval(),
        config.reconcile.poll_interval()
    );

    let (button, led) = blockswitch::gpio::claim(&config).context("Failed to claim GPIO pins")?;
    let control = PiholeCli::new(&config.control);

    Service::start(&config, button, led, control)
        .wait_for_shutdown()
        .await
        .context("Failed to wait for termination signal")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level, args.log_file.as_deref())
        .context("Failed to initialize logging")?;
    run(args).await
}
