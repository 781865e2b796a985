//! Relay records, states and commands.
//!
//! A relay is addressed by its GPIO pin number. The pin is supplied by the
//! caller and never checked against the hardware that is actually wired up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary relay state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelayState {
    On,
    #[default]
    Off,
}

impl RelayState {
    /// Wire representation ("on" / "off")
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayState::On => "on",
            RelayState::Off => "off",
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known state of a single relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relay {
    /// GPIO pin number (unique key)
    pub gpio: u32,

    /// Display name shown on the dashboard
    pub name: String,

    pub state: RelayState,

    /// When this record was last written. Advisory only, never used for ordering.
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl Relay {
    /// Create a relay in the OFF state, stamped with the current time
    pub fn new(gpio: u32, name: impl Into<String>) -> Self {
        Self {
            gpio,
            name: name.into(),
            state: RelayState::Off,
            last_updated: Utc::now(),
        }
    }
}

/// Request to drive one relay to a state.
///
/// Only the shape is validated: `gpio` must be a non-negative integer and
/// `state` one of "on" / "off". Whether the pin exists is not checked here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayCommand {
    pub gpio: u32,
    pub state: RelayState,
}
