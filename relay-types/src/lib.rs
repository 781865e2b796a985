//! Shared wire protocol types for the relay dashboard.
//!
//! This crate defines the types that cross boundaries between:
//! - the dashboard backend (this repository) - the relay state cache and proxy
//! - the browser dashboard - polls relays and issues commands
//! - the GPIO controller service - physically actuates the relays
//!
//! # Modules
//! - [`relay`] - Relay records, states and commands
//! - [`controller`] - Payloads exchanged with the GPIO controller

pub mod controller;
pub mod relay;

// Re-export commonly used types at crate root
pub use controller::{ControllerInfo, DEFAULT_PINS};
pub use relay::{Relay, RelayCommand, RelayState};
