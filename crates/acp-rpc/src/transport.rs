//! JSON-RPC transport.
//!
//! [`RpcTransport`] is the seam between the aggregator and the network;
//! [`HttpRpcTransport`] is the `reqwest` implementation.
//!
//! Connection failures and timeouts are retried up to [`MAX_RETRIES`]
//! times, backing off 200 ms, 400 ms, 800 ms. An HTTP response of any
//! status ends the attempt loop.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::RpcConfig;
use crate::error::TransportError;
use crate::jsonrpc::RpcResponse;

/// Retries after the first attempt.
pub const MAX_RETRIES: u32 = 3;
const BASE_DELAY: Duration = Duration::from_millis(200);

/// Posts one JSON-RPC request body and returns the raw HTTP response.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, body: &Value) -> Result<RpcResponse, TransportError>;
}

/// `reqwest`-backed transport with transport-level retry.
#[derive(Clone)]
pub struct HttpRpcTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl std::fmt::Debug for HttpRpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The endpoint path is the API key.
        f.debug_struct("HttpRpcTransport")
            .field("host", &self.endpoint.host_str())
            .finish_non_exhaustive()
    }
}

impl HttpRpcTransport {
    pub fn new(config: &RpcConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Build(e.without_url()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
        })
    }

    async fn send_with_retry(&self, body: &Value) -> Result<reqwest::Response, reqwest::Error> {
        let mut attempt = 0;
        loop {
            match self.http.post(self.endpoint.clone()).json(body).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < MAX_RETRIES => {
                    let delay = BASE_DELAY * 2u32.pow(attempt);
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = MAX_RETRIES,
                        to = body["params"][0]["to"].as_str().unwrap_or_default(),
                        error = %e.without_url(),
                        "eth_call not delivered; retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl RpcTransport for HttpRpcTransport {
    async fn post(&self, body: &Value) -> Result<RpcResponse, TransportError> {
        let resp = self
            .send_with_retry(body)
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?;
        Ok(RpcResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonrpc::eth_call_request;
    use std::time::Instant;

    #[tokio::test]
    async fn refused_connection_backs_off_then_fails_without_key() {
        // Closed port: every attempt is refused immediately, so the elapsed
        // time is the backoff schedule.
        let transport = HttpRpcTransport::new(&RpcConfig::local_mock("http://127.0.0.1:1").unwrap())
            .unwrap();
        let started = Instant::now();
        let err = transport
            .post(&eth_call_request("0xabc", "0xea50d0e4"))
            .await
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(200 + 400 + 800));
        assert!(matches!(err, TransportError::Http(_)));
        assert!(!err.to_string().contains("test-key"), "{err}");
    }
}
