use crate::config::ExplorerConfig;
use crate::errors::{ExplorerError, ExplorerResult};
use crate::explorer::types::{ExplorerAddress, ExplorerTx};
use crate::types::TxStatus;
use bitcoin::Amount;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client for a BlockCypher-compatible explorer API
#[derive(Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExplorerClient {
    pub fn new(config: &ExplorerConfig) -> ExplorerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|source| ExplorerError::Request {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/addrs/{address}`, returning `final_balance` in satoshis
    pub async fn address_balance(&self, address: &str) -> ExplorerResult<Amount> {
        let url = format!("{}/addrs/{}", self.base_url, address);
        let response: ExplorerAddress = self.get_json(&url).await?;
        to_satoshis("final_balance", response.final_balance).map(Amount::from_sat)
    }

    /// `GET {base}/txs/{txid}`
    pub async fn tx_status(&self, txid: &str) -> ExplorerResult<TxStatus> {
        let url = format!("{}/txs/{}", self.base_url, txid);
        let response: ExplorerTx = self.get_json(&url).await?;
        response.into_status()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ExplorerResult<T> {
        debug!("Explorer request: {}", url);

        let request_error = |source: reqwest::Error| ExplorerError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        serde_json::from_str(&body).map_err(|e| ExplorerError::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Explorer amounts are JSON numbers; only finite whole non-negative values are satoshis
pub(crate) fn to_satoshis(field: &'static str, value: f64) -> ExplorerResult<u64> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(ExplorerError::InvalidAmount { field, value });
    }
    Ok(value as u64)
}
