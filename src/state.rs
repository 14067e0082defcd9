//! Logical states shared by the input watcher and the reconciler.

use std::fmt;

/// On/off status of the ad blocker, as reported by the blocking utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockingState {
    Enabled,
    Disabled,
}

impl BlockingState {
    /// The state a button press switches to.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }
}

impl fmt::Display for BlockingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// Debounced transition of the push button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEvent {
    Pressed,
    Released,
    #[default]
    None,
}

/// Logical LED state. `On` mirrors [`BlockingState::Enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

impl From<BlockingState> for LedState {
    fn from(state: BlockingState) -> Self {
        match state {
            BlockingState::Enabled => Self::On,
            BlockingState::Disabled => Self::Off,
        }
    }
}

impl fmt::Display for LedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
