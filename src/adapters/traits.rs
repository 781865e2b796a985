//! Transport seam between the GPIO client and the network

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// A fully resolved request to the GPIO controller
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

/// Sends requests to the GPIO controller.
///
/// Implementations translate their own failures into the crate's error
/// taxonomy. They do not need to bound their own duration; the caller
/// wraps every send in a timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RemoteRequest) -> Result<Value>;
}
