//! Lightweight read-only Solana RPC client
//!
//! Implements only the JSON-RPC methods the accounting core needs, over
//! ureq instead of the full solana-client networking stack. Responses are
//! narrowed into `core::types` here; nothing untyped leaves this module.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::config::RpcConfig;
use crate::core::{
    AccountSnapshot, ChainReader, DecodeError, FetchedTransaction, LoadedAddresses, NetworkError,
    SignatureInfo, StatsResult, TokenAmount, TokenBalance, TransactionMeta,
};

/// Lightweight RPC client for Solana
pub struct LightRpcClient {
    url: String,
    commitment: String,
    agent: ureq::Agent,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// `{ context, value }` envelope
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// Account data response from RPC
#[derive(Debug, Deserialize)]
struct RpcAccount {
    lamports: u64,
    data: (String, String), // (data, encoding)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcSignature {
    signature: String,
    slot: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTransaction {
    slot: u64,
    transaction: (String, String), // (data, encoding)
    meta: Option<RpcMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcMeta {
    #[serde(default)]
    pre_balances: Vec<u64>,
    #[serde(default)]
    post_balances: Vec<u64>,
    #[serde(default)]
    pre_token_balances: Option<Vec<RpcTokenBalance>>,
    #[serde(default)]
    post_token_balances: Option<Vec<RpcTokenBalance>>,
    #[serde(default)]
    loaded_addresses: Option<RpcLoadedAddresses>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcTokenBalance {
    account_index: u8,
    mint: String,
    #[serde(default)]
    owner: Option<String>,
    ui_token_amount: RpcUiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcUiTokenAmount {
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    decimals: u8,
    #[serde(default)]
    ui_amount: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
struct RpcLoadedAddresses {
    #[serde(default)]
    writable: Vec<String>,
    #[serde(default)]
    readonly: Vec<String>,
}

impl LightRpcClient {
    /// Create a new lightweight RPC client
    pub fn new(url: String) -> Self {
        Self::from_config(&RpcConfig {
            endpoint: url,
            ..RpcConfig::default()
        })
    }

    /// Create a client with the configured timeouts and commitment
    pub fn from_config(config: &RpcConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(Duration::from_secs(config.read_timeout_secs))
            .build();

        Self {
            url: config.endpoint.clone(),
            commitment: config.commitment.clone(),
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> StatsResult<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {}", method, params);

        // Use blocking call since ureq is sync
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || -> StatsResult<String> {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;

                Ok(response.into_string()?)
            }
        })
        .await??;

        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)?;

        if let Some(error) = rpc_response.error {
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
            }
            .into());
        }

        Ok(rpc_response.result)
    }

    async fn call_required<T>(&self, method: &str, params: Value) -> StatsResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.call(method, params)
            .await?
            .ok_or_else(|| NetworkError::EmptyResult(method.to_string()).into())
    }
}

#[async_trait]
impl ChainReader for LightRpcClient {
    async fn get_account(&self, address: &Pubkey) -> StatsResult<Option<AccountSnapshot>> {
        let params = json!([
            address.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment
            }
        ]);

        let response: WithContext<Option<RpcAccount>> =
            self.call_required("getAccountInfo", params).await?;

        response.value.map(parse_account).transpose()
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> StatsResult<Vec<SignatureInfo>> {
        let params = json!([
            address.to_string(),
            {
                "limit": limit,
                "commitment": self.commitment
            }
        ]);

        let response: Vec<RpcSignature> =
            self.call_required("getSignaturesForAddress", params).await?;

        Ok(response
            .into_iter()
            .map(|s| SignatureInfo {
                signature: s.signature,
                slot: s.slot,
            })
            .collect())
    }

    async fn get_transaction(&self, signature: &str) -> StatsResult<Option<FetchedTransaction>> {
        let params = json!([
            signature,
            {
                "encoding": "base64",
                "commitment": self.commitment,
                "maxSupportedTransactionVersion": 0
            }
        ]);

        let response: Option<RpcTransaction> = self.call("getTransaction", params).await?;

        response
            .map(|tx| parse_transaction(signature, tx))
            .transpose()
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> StatsResult<u64> {
        self.call_required("getMinimumBalanceForRentExemption", json!([data_len]))
            .await
    }
}

fn decode_base64(data: &(String, String)) -> StatsResult<Vec<u8>> {
    if data.1 != "base64" {
        return Err(DecodeError::UnsupportedEncoding(data.1.clone()).into());
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(&data.0)?)
}

fn parse_pubkey(value: &str) -> StatsResult<Pubkey> {
    Ok(Pubkey::from_str(value)?)
}

fn parse_account(account: RpcAccount) -> StatsResult<AccountSnapshot> {
    Ok(AccountSnapshot {
        lamports: account.lamports,
        data: decode_base64(&account.data)?,
    })
}

fn parse_transaction(signature: &str, tx: RpcTransaction) -> StatsResult<FetchedTransaction> {
    Ok(FetchedTransaction {
        signature: signature.to_string(),
        slot: tx.slot,
        raw: decode_base64(&tx.transaction)?,
        meta: tx.meta.map(parse_meta).transpose()?,
    })
}

fn parse_meta(meta: RpcMeta) -> StatsResult<TransactionMeta> {
    let loaded = meta.loaded_addresses.unwrap_or_default();

    Ok(TransactionMeta {
        pre_balances: meta.pre_balances,
        post_balances: meta.post_balances,
        pre_token_balances: parse_token_balances(meta.pre_token_balances)?,
        post_token_balances: parse_token_balances(meta.post_token_balances)?,
        loaded_addresses: LoadedAddresses {
            writable: loaded.writable.iter().map(|k| parse_pubkey(k)).collect::<StatsResult<_>>()?,
            readonly: loaded.readonly.iter().map(|k| parse_pubkey(k)).collect::<StatsResult<_>>()?,
        },
    })
}

fn parse_token_balances(balances: Option<Vec<RpcTokenBalance>>) -> StatsResult<Vec<TokenBalance>> {
    balances
        .unwrap_or_default()
        .into_iter()
        .map(|b| {
            Ok(TokenBalance {
                account_index: b.account_index,
                mint: parse_pubkey(&b.mint)?,
                owner: b.owner.as_deref().map(parse_pubkey).transpose()?,
                amount: TokenAmount {
                    raw: b.ui_token_amount.amount.and_then(|a| a.parse().ok()),
                    decimals: b.ui_token_amount.decimals,
                    ui_amount: b.ui_token_amount.ui_amount.as_ref().and_then(ui_amount_value),
                },
            })
        })
        .collect()
}

/// `uiAmount` arrives as a number, a string, or null
fn ui_amount_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
