use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use reqwest::Response;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::models::ConversionDirection;

use super::{ChainClient, ChainClientError, ConversionAmountRequest};

pub const RETRYABLE_ERROR_CODES: [u16; 3] = [
    429, // TOO_MANY_REQUESTS
    500, // INTERNAL_SERVER_ERROR
    503, // SERVICE_UNAVAILABLE
];

/// Base backoff in milliseconds.
const BASE_BACKOFF_MILLIS: Duration = Duration::from_millis(256);

const UTXO_TO_LEDGER_RATE_METHOD: &str = "quai_qiToQuai";
const LEDGER_TO_UTXO_RATE_METHOD: &str = "quai_quaiToQi";
const CONVERSION_AMOUNT_METHOD: &str = "quai_calculateConversionAmount";

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `ChainClient` speaking JSON-RPC 2.0 to a node endpoint.
pub struct JsonRpcChainClient {
    url: String,
    client: OnceLock<reqwest::Client>,
    max_retries: usize,
    next_request_id: AtomicU64,
}

impl JsonRpcChainClient {
    pub fn new(url: String, max_retries: usize) -> Self {
        Self {
            url,
            client: OnceLock::new(),
            max_retries,
            next_request_id: AtomicU64::new(1),
        }
    }

    fn get_client(&self) -> Result<&reqwest::Client, ChainClientError> {
        if let Some(c) = self.client.get() {
            return Ok(c);
        }

        let client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(5))
            .build()?;
        let client = self.client.get_or_init(|| client);
        Ok(client)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainClientError> {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!("Calling {method} on {} (id {id})", self.url);
        let response = self.post_with_retry(&body, self.get_client()?).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainClientError::ServiceConnectivity(format!(
                "{method} returned HTTP {}: {}",
                status.as_u16(),
                response.text().await?
            )));
        }

        let response: RpcResponse<T> = serde_json::from_str(&response.text().await?)?;
        match response {
            RpcResponse {
                error: Some(error), ..
            } => Err(ChainClientError::Rpc {
                code: error.code,
                message: error.message,
            }),
            RpcResponse {
                result: Some(result),
                ..
            } => Ok(result),
            _ => Err(ChainClientError::InvalidResponse(format!(
                "{method} returned neither result nor error"
            ))),
        }
    }

    async fn post_with_retry(
        &self,
        body: &Value,
        client: &reqwest::Client,
    ) -> Result<Response, reqwest::Error> {
        let mut delay = BASE_BACKOFF_MILLIS;
        let mut attempts = 0usize;

        loop {
            match client.post(&self.url).json(body).send().await? {
                resp if attempts < self.max_retries && is_status_retryable(resp.status()) => {
                    info!(
                        "Retrying request after status {} (attempt {})",
                        resp.status(),
                        attempts.saturating_add(1)
                    );
                    tokio::time::sleep(delay).await;
                    attempts = attempts.saturating_add(1);
                    delay = delay.saturating_mul(2);
                }
                resp => return Ok(resp),
            }
        }
    }
}

#[async_trait::async_trait]
impl ChainClient for JsonRpcChainClient {
    async fn get_latest_rate(
        &self,
        direction: ConversionDirection,
        unit_amount: u128,
    ) -> Result<u128, ChainClientError> {
        let method = match direction {
            ConversionDirection::UtxoToLedger => UTXO_TO_LEDGER_RATE_METHOD,
            ConversionDirection::LedgerToUtxo => LEDGER_TO_UTXO_RATE_METHOD,
        };
        let rate: String = self
            .call(method, json!([to_quantity(unit_amount), "latest"]))
            .await?;
        parse_quantity(&rate)
    }

    async fn calculate_conversion_amount(
        &self,
        request: ConversionAmountRequest,
    ) -> Result<u128, ChainClientError> {
        let value = request.value.parse::<u128>().map_err(|e| {
            ChainClientError::Generic(format!("Invalid conversion value {}: {e}", request.value))
        })?;
        let amount: String = self
            .call(
                CONVERSION_AMOUNT_METHOD,
                json!([{
                    "from": request.from,
                    "to": request.to,
                    "value": to_quantity(value),
                }]),
            )
            .await?;
        parse_quantity(&amount)
    }
}

impl From<reqwest::Error> for ChainClientError {
    fn from(err: reqwest::Error) -> Self {
        let mut err_str = err.to_string();
        let mut walk: &dyn std::error::Error = &err;
        while let Some(src) = walk.source() {
            err_str.push_str(format!(" : {src}").as_str());
            walk = src;
        }
        ChainClientError::ServiceConnectivity(err_str)
    }
}

fn is_status_retryable(status: reqwest::StatusCode) -> bool {
    RETRYABLE_ERROR_CODES.contains(&status.as_u16())
}

fn to_quantity(value: u128) -> String {
    format!("0x{value:x}")
}

fn parse_quantity(quantity: &str) -> Result<u128, ChainClientError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| ChainClientError::InvalidResponse(format!("Not a quantity: {quantity}")))?;
    u128::from_str_radix(digits, 16)
        .map_err(|e| ChainClientError::InvalidResponse(format!("Not a quantity {quantity}: {e}")))
}
