use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::common::config::AppConfig;
use crate::error::{Error, Result};
use crate::health::{CometStatus, StatusClient};

/// JSON-RPC envelope returned by CometBFT's `/status` route.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<CometStatus>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: String,
}

impl RpcResponse {
    fn into_status(self) -> Result<CometStatus> {
        if let Some(err) = self.error {
            let mut msg = format!("rpc error {}: {}", err.code, err.message);
            if !err.data.is_empty() {
                msg.push_str(&format!(" ({})", err.data));
            }
            return Err(Error::Rpc(msg));
        }
        self.result
            .ok_or_else(|| Error::Rpc("status response missing result".to_string()))
    }
}

/// Builds the `/status` URL for a node RPC address.
///
/// Accepts full URLs as well as bare `host:port`, which is assumed to be
/// plain HTTP. Schemes match case-insensitively.
pub fn status_url(address: &str) -> Result<Url> {
    let has_scheme = address.split_once("://").is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    });
    let base = if has_scheme {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    let mut url = Url::parse(&base).map_err(|e| Error::InvalidAddress(format!("{address}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| Error::InvalidAddress(address.to_string()))?
        .pop_if_empty()
        .push("status");
    Ok(url)
}

/// CometBFT RPC client used for health probes.
#[derive(Clone)]
pub struct CometClient {
    client: reqwest::Client,
}

impl CometClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(AppConfig::CONNECTION_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(AppConfig::POOL_IDLE_TIMEOUT_SECS))
            .pool_max_idle_per_host(AppConfig::POOL_MAX_IDLE_PER_HOST)
            .tcp_keepalive(Duration::from_secs(AppConfig::TCP_KEEPALIVE_SECS))
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_status(&self, url: Url) -> Result<CometStatus> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Rpc(format!("HTTP {}", response.status())));
        }

        let text = response.text().await?;
        let envelope: RpcResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Rpc(format!("malformed status response: {e}")))?;
        envelope.into_status()
    }
}

#[async_trait]
impl StatusClient for CometClient {
    async fn status(&self, scope: &CancellationToken, address: &str) -> Result<CometStatus> {
        let url = status_url(address)?;

        tokio::select! {
            biased;
            _ = scope.cancelled() => Err(Error::Cancelled),
            result = self.fetch_status(url) => result,
        }
    }
}
