//! In-memory relay state cache
//!
//! The GPIO controller has no bulk status endpoint, so the dashboard shows
//! the state recorded here after each successful command. It is the source
//! of truth for what the UI displays, not for what the hardware is doing.

use chrono::Utc;
use relay_types::{Relay, RelayState, DEFAULT_PINS};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Error, Result};

/// Relays in insertion order, one record per GPIO pin.
///
/// All mutation goes through a single write lock, so `set_all_states` is
/// never observed half-applied.
pub struct RelayStore {
    relays: RwLock<Vec<Relay>>,
}

impl RelayStore {
    /// Seed the store with `pins`, all OFF, named "Relay 1", "Relay 2", ...
    ///
    /// Duplicate pins keep their first position.
    pub fn new(pins: &[u32]) -> Self {
        let mut relays: Vec<Relay> = Vec::with_capacity(pins.len());
        for &gpio in pins {
            if relays.iter().any(|r| r.gpio == gpio) {
                continue;
            }
            let name = format!("Relay {}", relays.len() + 1);
            relays.push(Relay::new(gpio, name));
        }

        Self {
            relays: RwLock::new(relays),
        }
    }

    pub async fn list(&self) -> Vec<Relay> {
        self.relays.read().await.clone()
    }

    pub async fn get(&self, gpio: u32) -> Option<Relay> {
        self.relays
            .read()
            .await
            .iter()
            .find(|r| r.gpio == gpio)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.relays.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.relays.read().await.is_empty()
    }

    /// Overwrite the state of a known relay
    pub async fn set_state(&self, gpio: u32, state: RelayState) -> Result<Relay> {
        let mut relays = self.relays.write().await;
        let relay = relays
            .iter_mut()
            .find(|r| r.gpio == gpio)
            .ok_or(Error::NotFound { gpio })?;

        relay.state = state;
        relay.last_updated = Utc::now();
        info!("Relay {} (GPIO {}) -> {}", relay.name, gpio, state);
        Ok(relay.clone())
    }

    /// Overwrite the state of every known relay in one step
    pub async fn set_all_states(&self, state: RelayState) -> Vec<Relay> {
        let mut relays = self.relays.write().await;
        let now = Utc::now();
        for relay in relays.iter_mut() {
            relay.state = state;
            relay.last_updated = now;
        }
        info!("All {} relays -> {}", relays.len(), state);
        relays.clone()
    }
}

impl Default for RelayStore {
    fn default() -> Self {
        Self::new(&DEFAULT_PINS)
    }
}
