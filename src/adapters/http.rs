//! reqwest-backed transport for the GPIO controller
//!
//! Maps transport failures onto the error taxonomy: timeouts, refused
//! connections and failed name resolution each get their own variant so the
//! dashboard can tell the operator what to check.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::warn;

use crate::adapters::traits::{RemoteRequest, Transport};
use crate::error::{Error, Result};

pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "Failed to build HTTP client with custom config: {}. Using default.",
                    e
                );
                Client::default()
            });

        Self { client, timeout }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RemoteRequest) -> Result<Value> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(&request.url, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteError {
                status: status
                    .canonical_reason()
                    .map(|reason| reason.to_string())
                    .unwrap_or_else(|| status.as_str().to_string()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(&request.url, &e, self.timeout))?;

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::Transport {
            url: request.url.clone(),
            message: format!("invalid JSON in response: {}", e),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectFailure {
    Refused,
    HostNotFound,
}

fn classify(url: &str, err: &reqwest::Error, after: Duration) -> Error {
    if err.is_timeout() {
        return Error::Timeout {
            url: url.to_string(),
            after,
        };
    }

    match connect_failure(err) {
        Some(ConnectFailure::Refused) => Error::ConnectionRefused {
            url: url.to_string(),
        },
        Some(ConnectFailure::HostNotFound) => Error::HostNotFound {
            url: url.to_string(),
        },
        None => Error::Transport {
            url: url.to_string(),
            message: error_chain(err),
        },
    }
}

/// Walk the source chain looking for a refused connection or a resolver error.
///
/// reqwest only reports "error sending request"; the cause sits a few levels
/// down (hyper-util connect error, then the io::Error from the socket or
/// getaddrinfo).
fn connect_failure(err: &(dyn StdError + 'static)) -> Option<ConnectFailure> {
    for cause in std::iter::successors(Some(err), |&e| e.source()) {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return Some(ConnectFailure::Refused);
            }
        }

        let text = cause.to_string().to_lowercase();
        if text.contains("connection refused") {
            return Some(ConnectFailure::Refused);
        }
        if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
            || text.contains("no such host")
        {
            return Some(ConnectFailure::HostNotFound);
        }
    }
    None
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
    use reqwest::Method;
    use serde_json::json;
    use std::fmt;
    use tokio::net::TcpListener;

    #[derive(Debug)]
    struct Wrapped {
        msg: &'static str,
        source: std::io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.source)
        }
    }

    #[test]
    fn test_connect_failure_finds_refused_io_error() {
        let err = Wrapped {
            msg: "tcp connect error",
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(connect_failure(&err), Some(ConnectFailure::Refused));
    }

    #[test]
    fn test_connect_failure_finds_dns_error() {
        let err = Wrapped {
            msg: "dns error",
            source: std::io::Error::other(
                "failed to lookup address information: Name or service not known",
            ),
        };
        assert_eq!(connect_failure(&err), Some(ConnectFailure::HostNotFound));
    }

    #[test]
    fn test_connect_failure_ignores_other_errors() {
        let err = Wrapped {
            msg: "connection closed before message completed",
            source: std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        };
        assert_eq!(connect_failure(&err), None);
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request(method: Method, url: String, body: Option<Value>) -> RemoteRequest {
        RemoteRequest { method, url, body }
    }

    #[tokio::test]
    async fn test_success_returns_parsed_body() {
        let base = serve(Router::new().route(
            "/relay",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"gpio": body["gpio"], "state": body["state"]}))
            }),
        ))
        .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let result = transport
            .send(request(
                Method::POST,
                format!("{}/relay", base),
                Some(json!({"gpio": 17, "state": "on"})),
            ))
            .await
            .unwrap();

        assert_eq!(result, json!({"gpio": 17, "state": "on"}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_error() {
        let base = serve(Router::new().route(
            "/relay/all_on",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let err = transport
            .send(request(Method::POST, format!("{}/relay/all_on", base), None))
            .await
            .unwrap_err();

        match err {
            Error::RemoteError { status } => assert_eq!(status, "Internal Server Error"),
            other => panic!("Expected RemoteError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let base = serve(Router::new().route("/", get(|| async { StatusCode::OK }))).await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let result = transport
            .send(request(Method::GET, format!("{}/", base), None))
            .await
            .unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_refused_connection() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Duration::from_secs(5));
        let err = transport
            .send(request(Method::GET, format!("http://{}/", addr), None))
            .await
            .unwrap_err();

        assert!(
            matches!(err, Error::ConnectionRefused { .. }),
            "Expected ConnectionRefused, got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        // .invalid never resolves (RFC 6761)
        let transport = HttpTransport::new(Duration::from_secs(5));
        let err = transport
            .send(request(
                Method::GET,
                "http://no-such-host.invalid:8000/".to_string(),
                None,
            ))
            .await
            .unwrap_err();

        match err {
            Error::HostNotFound { url } => assert_eq!(url, "http://no-such-host.invalid:8000/"),
            other => panic!("Expected HostNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold connections without ever answering
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let transport = HttpTransport::new(Duration::from_millis(200));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            transport.send(request(Method::GET, format!("http://{}/", addr), None)),
        )
        .await
        .expect("transport should give up on its own");

        assert!(
            matches!(result, Err(Error::Timeout { .. })),
            "Expected Timeout, got {:?}",
            result
        );
    }
}
