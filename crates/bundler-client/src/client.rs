//! HTTP transport for the bundler's JSON-RPC surface.
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use txflow_core::{GasEstimate, UserOperation};

use crate::error::BundlerError;

/// Markers that identify an endpoint nobody ever configured: template
/// domains and an unreplaced API-key slot.
const PLACEHOLDER_MARKERS: &[&str] = &["YOUR_API_KEY", "example.com", "example.org", "<", ">"];

/// True when `endpoint` is empty or still carries a placeholder marker.
/// Checked before every request so a misconfigured deployment degrades to
/// the direct path instead of hammering a template URL.
pub fn endpoint_is_placeholder(endpoint: &str) -> bool {
    let trimmed = endpoint.trim();
    trimmed.is_empty() || PLACEHOLDER_MARKERS.iter().any(|marker| trimmed.contains(marker))
}

/// Bundler operations the pipeline consumes.
#[async_trait]
pub trait BundlerApi: Send + Sync {
    /// Whether the endpoint looks usable; `false` means every call would
    /// return [`BundlerError::Unconfigured`].
    fn is_configured(&self) -> bool;

    /// `eth_estimateUserOperationGas`.
    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperation,
    ) -> Result<GasEstimate, BundlerError>;

    /// `eth_sendUserOperation`; returns the operation hash.
    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
    ) -> Result<B256, BundlerError>;

    /// `eth_getUserOperationCount` for a sender address.
    async fn get_user_operation_count(&self, sender: Address) -> Result<U256, BundlerError>;
}

/// JSON-RPC over HTTP with a fixed request envelope and a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpBundlerClient {
    http: reqwest::Client,
    endpoint: String,
    entry_point: Address,
}

#[derive(Debug, serde::Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct JsonRpcResponse<R> {
    #[serde(default)]
    result: Option<R>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, serde::Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl HttpBundlerClient {
    pub fn new(
        endpoint: impl Into<String>,
        entry_point: Address,
        timeout: Duration,
    ) -> Result<Self, BundlerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            entry_point,
        })
    }

    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, BundlerError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if !self.is_configured() {
            return Err(BundlerError::Unconfigured);
        }

        let envelope = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(method = method, endpoint = %self.endpoint, "Sending bundler request");

        let response = self.http.post(&self.endpoint).json(&envelope).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BundlerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: JsonRpcResponse<R> = serde_json::from_str(&body)
            .map_err(|e| BundlerError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(BundlerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| BundlerError::InvalidResponse("response carries no result".to_string()))
    }
}

#[async_trait]
impl BundlerApi for HttpBundlerClient {
    fn is_configured(&self) -> bool {
        !endpoint_is_placeholder(&self.endpoint)
    }

    async fn estimate_user_operation_gas(
        &self,
        user_operation: &UserOperation,
    ) -> Result<GasEstimate, BundlerError> {
        self.request(
            "eth_estimateUserOperationGas",
            (user_operation, self.entry_point),
        )
        .await
    }

    async fn send_user_operation(
        &self,
        user_operation: &UserOperation,
    ) -> Result<B256, BundlerError> {
        self.request("eth_sendUserOperation", (user_operation, self.entry_point))
            .await
    }

    async fn get_user_operation_count(&self, sender: Address) -> Result<U256, BundlerError> {
        self.request("eth_getUserOperationCount", (sender, self.entry_point))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_endpoints_are_detected() {
        assert!(endpoint_is_placeholder(""));
        assert!(endpoint_is_placeholder("   "));
        assert!(endpoint_is_placeholder(
            "https://bundler.example.com/rpc/v1"
        ));
        assert!(endpoint_is_placeholder(
            "https://api.pimlico.io/v1/base/rpc?apikey=YOUR_API_KEY"
        ));
        assert!(endpoint_is_placeholder("https://<bundler-host>/rpc"));

        assert!(!endpoint_is_placeholder(
            "https://bundler.base.org/rpc/v1?apikey=abc123"
        ));
        assert!(!endpoint_is_placeholder("http://localhost:4337"));
    }
}
