//! Command proxy: forwards relay commands to the GPIO controller and records
//! the outcome in the relay store.
//!
//! A command either fully succeeds (controller accepted it and the store
//! reflects it) or fully fails (store untouched, error returned). The store
//! is only written after the controller has answered successfully, so it
//! never claims a change the device did not make.

use relay_types::{ControllerInfo, Relay, RelayCommand, RelayState};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::adapters::GpioClient;
use crate::error::{Error, Result};
use crate::relays::RelayStore;

/// Message reported when the controller's root path does not send one
const DEFAULT_STATUS_MESSAGE: &str = "API connected";

/// Controller reply merged with the updated relay
#[derive(Debug, Clone, Serialize)]
pub struct RelayOutcome {
    #[serde(flatten)]
    pub result: Map<String, Value>,
    pub relay: Relay,
}

/// Controller reply merged with every updated relay
#[derive(Debug, Clone, Serialize)]
pub struct BulkOutcome {
    #[serde(flatten)]
    pub result: Map<String, Value>,
    pub relays: Vec<Relay>,
}

/// Result of probing the controller's root path
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusReport {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    fn connected(info: ControllerInfo) -> Self {
        let pins = info.pins_or_default();
        Self {
            connected: true,
            message: Some(
                info.message
                    .unwrap_or_else(|| DEFAULT_STATUS_MESSAGE.to_string()),
            ),
            pins: Some(pins),
            error: None,
        }
    }

    fn disconnected(error: &Error) -> Self {
        Self {
            connected: false,
            message: None,
            pins: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct RelayProxy {
    client: GpioClient,
    relays: Arc<RelayStore>,
}

impl RelayProxy {
    pub fn new(client: GpioClient, relays: Arc<RelayStore>) -> Self {
        Self { client, relays }
    }

    pub fn relays(&self) -> &Arc<RelayStore> {
        &self.relays
    }

    /// Probe the controller. Failures are reported as "not connected".
    pub async fn status(&self) -> StatusReport {
        match self.client.get("/").await {
            Ok(value) => StatusReport::connected(ControllerInfo::from_value(&value)),
            Err(e) => StatusReport::disconnected(&e),
        }
    }

    /// Drive one relay, then record its new state
    pub async fn set_relay(&self, command: RelayCommand) -> Result<RelayOutcome> {
        let body = json!({
            "gpio": command.gpio,
            "state": command.state.as_str(),
        });
        let result = self.client.post("/relay", Some(body)).await?;
        ensure_accepted(&result)?;

        let relay = self
            .relays
            .set_state(command.gpio, command.state)
            .await
            .inspect_err(|_| {
                warn!(
                    "Controller accepted GPIO {} but it is not a known relay",
                    command.gpio
                )
            })?;

        Ok(RelayOutcome {
            result: into_fields(result, "relay"),
            relay,
        })
    }

    /// Drive every relay, then record the new state for all of them
    pub async fn set_all(&self, state: RelayState) -> Result<BulkOutcome> {
        let path = match state {
            RelayState::On => "/relay/all_on",
            RelayState::Off => "/relay/all_off",
        };
        let result = self.client.post(path, None).await?;
        ensure_accepted(&result)?;

        let relays = self.relays.set_all_states(state).await;
        Ok(BulkOutcome {
            result: into_fields(result, "relays"),
            relays,
        })
    }

    /// Currently configured controller endpoint
    pub async fn endpoint(&self) -> Option<String> {
        self.client.endpoint().get().await
    }

    /// Point all subsequent controller calls at `endpoint`
    pub async fn set_endpoint(&self, endpoint: impl Into<String>) {
        self.client.endpoint().set(endpoint).await;
    }
}

/// A 2xx reply can still carry `{"error": ...}` when the controller refuses
/// the command (e.g. an undeclared pin).
fn ensure_accepted(result: &Value) -> Result<()> {
    match result.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(Error::RemoteError {
            status: message.clone(),
        }),
        Some(other) => Err(Error::RemoteError {
            status: other.to_string(),
        }),
    }
}

/// Spread the controller reply into the response object.
///
/// Objects are merged key by key (minus `reserved`, which the proxy fills
/// in itself), `null` contributes nothing, anything else lands under
/// `result`.
fn into_fields(result: Value, reserved: &str) -> Map<String, Value> {
    match result {
        Value::Object(mut map) => {
            map.remove(reserved);
            map
        }
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}
