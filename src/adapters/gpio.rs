//! GPIO controller client
//!
//! Resolves relative paths against the configured endpoint and bounds every
//! call in time. The controller is a remote peer that may be slow or absent,
//! so a call either returns its JSON reply or one categorized error.

use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::adapters::http::HttpTransport;
use crate::adapters::traits::{RemoteRequest, Transport};
use crate::config::EndpointConfig;
use crate::error::{Error, Result};

#[derive(Clone)]
pub struct GpioClient {
    endpoint: EndpointConfig,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl GpioClient {
    /// Client talking HTTP to whatever `endpoint` holds at call time
    pub fn new(endpoint: EndpointConfig, timeout: Duration) -> Self {
        Self::with_transport(endpoint, Arc::new(HttpTransport::new(timeout)), timeout)
    }

    pub fn with_transport(
        endpoint: EndpointConfig,
        transport: Arc<dyn Transport>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint,
            transport,
            timeout,
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Call `path` on the controller.
    ///
    /// Fails with [`Error::ConfigMissing`] before touching the transport when
    /// no endpoint is set, and with [`Error::Timeout`] once the bound elapses.
    pub async fn call(&self, path: &str, method: Method, body: Option<Value>) -> Result<Value> {
        let base = self.endpoint.get().await.ok_or(Error::ConfigMissing)?;
        let url = join_url(&base, path);

        debug!(method = %method, url = %url, body = ?body, "Relay controller request");

        let request = RemoteRequest {
            method,
            url: url.clone(),
            body,
        };

        let result = match tokio::time::timeout(self.timeout, self.transport.send(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                url: url.clone(),
                after: self.timeout,
            }),
        };

        match &result {
            Ok(value) => debug!(url = %url, result = ?value, "Relay controller response"),
            Err(e) => warn!(url = %url, kind = e.kind(), "Relay controller request failed: {}", e),
        }

        result
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.call(path, Method::GET, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.call(path, Method::POST, body).await
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
