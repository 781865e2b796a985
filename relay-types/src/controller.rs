//! Payloads exchanged with the GPIO controller.

use serde_json::Value;

/// Pins assumed when the controller does not report its own list.
pub const DEFAULT_PINS: [u32; 4] = [17, 27, 22, 23];

/// Reply of the controller's root path (`GET /`).
///
/// Both fields are optional; controllers that predate the pin listing only
/// answer with a message, and some answer with nothing at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerInfo {
    pub message: Option<String>,

    pub pins: Option<Vec<u32>>,
}

impl ControllerInfo {
    /// Read whatever is usable out of an arbitrary JSON reply.
    ///
    /// A `pins` value that is not an array of non-negative integers is
    /// treated as absent rather than as an error.
    pub fn from_value(value: &Value) -> Self {
        let message = value
            .get("message")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let pins = value
            .get("pins")
            .and_then(|v| v.as_array())
            .and_then(|arr| {
                arr.iter()
                    .map(|p| p.as_u64().and_then(|n| u32::try_from(n).ok()))
                    .collect::<Option<Vec<u32>>>()
            });

        Self { message, pins }
    }

    /// Reported pins, or [`DEFAULT_PINS`] when the controller did not list any
    pub fn pins_or_default(&self) -> Vec<u32> {
        self.pins
            .clone()
            .unwrap_or_else(|| DEFAULT_PINS.to_vec())
    }
}
