//! Relay Dashboard - backend for a browser dashboard that toggles relays
//! driven by a remote GPIO controller.
//!
//! This library provides:
//! - A relay state cache (the controller has no bulk status endpoint)
//! - A bounded, failure-categorizing client for the GPIO controller
//! - A command proxy that only records state the controller confirmed
//! - The JSON HTTP API consumed by the dashboard

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod proxy;
pub mod relays;

pub use error::{Error, Result};
