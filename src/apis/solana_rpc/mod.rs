/// Solana JSON-RPC client
///
/// Methods used:
/// 1. getTokenAccountsByOwner - SPL token accounts (jsonParsed) per token program
/// 2. getBalance - native lamports
pub mod types;

use self::types::{KeyedTokenAccount, RpcContextual, RpcEnvelope};
use crate::balances::aggregator::BalanceSource;
use crate::errors::RpcError;
use crate::http::RateLimitedHttpClient;
use crate::logger::{self, LogTag};
use crate::tokens::types::TokenAccountBalance;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct SolanaRpcClient {
    http: RateLimitedHttpClient,
    url: String,
    commitment: String,
    /// Token programs queried by `token_balances`, in order
    token_programs: Vec<String>,
    next_id: AtomicU64,
}

impl SolanaRpcClient {
    pub fn new(
        http: RateLimitedHttpClient,
        url: impl Into<String>,
        commitment: impl Into<String>,
        include_token_2022: bool,
    ) -> Self {
        let mut token_programs = vec![spl_token::id().to_string()];
        if include_token_2022 {
            token_programs.push(spl_token_2022::id().to_string());
        }

        Self {
            http,
            url: url.into(),
            commitment: commitment.into(),
            token_programs,
            next_id: AtomicU64::new(1),
        }
    }

    /// Send one JSON-RPC call and unwrap its envelope
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        logger::debug(LogTag::Rpc, &format!("{} #{} -> {}", method, id, self.url));

        let envelope: RpcEnvelope<T> = self.http.post_json(&self.url, body).await?;
        if let Some(error) = envelope.error {
            return Err(RpcError::Response {
                code: error.code,
                message: error.message,
            });
        }
        envelope.result.ok_or(RpcError::MissingResult)
    }

    /// Token accounts owned by `owner` under one token program
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        program_id: &str,
    ) -> Result<Vec<TokenAccountBalance>, RpcError> {
        let params = json!([
            owner,
            { "programId": program_id },
            { "encoding": "jsonParsed", "commitment": self.commitment }
        ]);

        let result: RpcContextual<Vec<Value>> =
            self.call("getTokenAccountsByOwner", params).await?;

        let mut balances = Vec::with_capacity(result.value.len());
        for item in result.value {
            match serde_json::from_value::<KeyedTokenAccount>(item) {
                Ok(account) => {
                    let info = account.account.data.parsed.info;
                    balances.push(TokenAccountBalance {
                        mint: info.mint,
                        amount: info.token_amount.ui_amount(),
                    });
                }
                Err(e) => {
                    logger::debug(
                        LogTag::Rpc,
                        &format!("Skipping unparsed token account of {}: {}", owner, e),
                    );
                }
            }
        }

        Ok(balances)
    }

    /// Native balance in lamports
    pub async fn get_balance(&self, owner: &str) -> Result<u64, RpcError> {
        let params = json!([owner, { "commitment": self.commitment }]);
        let result: RpcContextual<u64> = self.call("getBalance", params).await?;
        Ok(result.value)
    }
}

#[async_trait]
impl BalanceSource for SolanaRpcClient {
    async fn token_balances(&self, owner: &str) -> Result<Vec<TokenAccountBalance>, RpcError> {
        let mut all = Vec::new();
        for program_id in &self.token_programs {
            let mut balances = self.get_token_accounts_by_owner(owner, program_id).await?;
            logger::debug(
                LogTag::Rpc,
                &format!("{} token accounts of {} under {}", balances.len(), owner, program_id),
            );
            all.append(&mut balances);
        }
        Ok(all)
    }

    async fn native_balance(&self, owner: &str) -> Result<u64, RpcError> {
        self.get_balance(owner).await
    }
}
