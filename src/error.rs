//! Error taxonomy for relay commands and GPIO controller calls

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No controller endpoint has been configured
    #[error("API endpoint not configured. Please configure the endpoint in the dashboard.")]
    ConfigMissing,

    /// The controller did not answer within the bound
    #[error(
        "Request to {url} timed out after {}s. The relay controller may be unreachable; check that it is powered on and on the network.",
        .after.as_secs_f32()
    )]
    Timeout { url: String, after: Duration },

    #[error("Connection refused by {url}. Is the relay controller service running?")]
    ConnectionRefused { url: String },

    #[error("Host not found for {url}. Check the configured endpoint address.")]
    HostNotFound { url: String },

    /// Non-2xx reply, or a 2xx reply carrying an `error` field
    #[error("API request failed: {status}")]
    RemoteError { status: String },

    /// Any other network or decoding failure
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{message}")]
    Validation {
        message: String,
        details: Option<String>,
    },

    #[error("GPIO {gpio} not found")]
    NotFound { gpio: u32 },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Short stable identifier, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigMissing => "config_missing",
            Self::Timeout { .. } => "timeout",
            Self::ConnectionRefused { .. } => "connection_refused",
            Self::HostNotFound { .. } => "host_not_found",
            Self::RemoteError { .. } => "remote_error",
            Self::Transport { .. } => "transport",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
        }
    }
}
