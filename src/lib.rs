//! blockswitch - Toggle Pi-hole ad blocking with a push button.
//!
//! A small service for a Raspberry Pi: pressing a push button switches ad
//! blocking on or off, and an LED shows whether blocking is currently enabled.
//!
//! # Architecture
//!
//! - [`watcher`]: samples and debounces the button, toggles blocking on press
//! - [`reconciler`]: polls the blocker and keeps the LED in sync with it
//! - [`control`]: the blocker's command-line interface
//! - [`gpio`]: button and LED pins
//! - [`led`]: the LED shared by both loops
//! - [`service`]: runs both loops and handles shutdown
//! - [`config`], [`logging`], [`error`]: ambient concerns
//!
//! # Testing
//!
//! The loops only depend on the [`gpio::InputPin`], [`gpio::OutputPin`] and
//! [`control::BlockingControl`] traits, so they run against in-memory fakes:
//!
//! ```rust
//! use blockswitch::debounce::Debouncer;
//! use blockswitch::state::ButtonEvent;
//!
//! let mut debouncer = Debouncer::new(2);
//! assert_eq!(debouncer.sample(true), ButtonEvent::None);
//! assert_eq!(debouncer.sample(true), ButtonEvent::Pressed);
//! ```

pub mod config;
pub mod control;
pub mod debounce;
pub mod error;
pub mod gpio;
pub mod led;
pub mod logging;
pub mod reconciler;
pub mod service;
pub mod state;
pub mod watcher;

pub use config::Config;
pub use error::{Error, Result};
