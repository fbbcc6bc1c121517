/// Per-address balance aggregation
///
/// Flow: token accounts → dust filter → metadata → unknown filter → coin id →
/// price, then the native SOL row. Per-token enrichment runs concurrently
/// within one address.
use super::filter::BalanceFilter;
use crate::errors::{AddressProcessingError, RpcError};
use crate::logger::{self, LogTag};
use crate::tokens::coin_list::CoinList;
use crate::tokens::metadata::TokenMetadataResolver;
use crate::tokens::prices::PriceResolver;
use crate::tokens::types::{OutputRow, TokenAccountBalance, TokenBalance, TokenKind, UNKNOWN};
use async_trait::async_trait;
use futures::future::join_all;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;

/// Mint column value of the native row
pub const NATIVE_MINT: &str = "SOL";
pub const NATIVE_NAME: &str = "Solana";
pub const NATIVE_SYMBOL: &str = "SOL";

/// On-chain balances of one wallet
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Token accounts across every configured token program
    async fn token_balances(&self, owner: &str) -> Result<Vec<TokenAccountBalance>, RpcError>;

    /// Native balance in lamports
    async fn native_balance(&self, owner: &str) -> Result<u64, RpcError>;
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

pub struct BalanceAggregator {
    balances: Arc<dyn BalanceSource>,
    metadata: Arc<TokenMetadataResolver>,
    coin_list: Arc<CoinList>,
    prices: Arc<PriceResolver>,
    filter: BalanceFilter,
    /// Coin id used to price the native row
    native_price_id: String,
}

impl BalanceAggregator {
    pub fn new(
        balances: Arc<dyn BalanceSource>,
        metadata: Arc<TokenMetadataResolver>,
        coin_list: Arc<CoinList>,
        prices: Arc<PriceResolver>,
        filter: BalanceFilter,
        native_price_id: impl Into<String>,
    ) -> Self {
        Self {
            balances,
            metadata,
            coin_list,
            prices,
            filter,
            native_price_id: native_price_id.into(),
        }
    }

    /// Rows for `address` priced on `date` (`YYYY-MM-DD`); token rows first,
    /// native row last
    pub async fn aggregate(
        &self,
        address: &str,
        date: &str,
    ) -> Result<Vec<OutputRow>, AddressProcessingError> {
        Pubkey::from_str(address).map_err(|e| AddressProcessingError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        let accounts = self
            .balances
            .token_balances(address)
            .await
            .map_err(|source| AddressProcessingError::Rpc {
                address: address.to_string(),
                method: "getTokenAccountsByOwner",
                source,
            })?;

        let total = accounts.len();
        let accounts = self.filter.apply_dust(accounts);
        logger::info(
            LogTag::Export,
            &format!(
                "{}: {} token accounts, {} after dust filter",
                address,
                total,
                accounts.len()
            ),
        );

        let mut rows: Vec<OutputRow> = join_all(
            accounts
                .iter()
                .map(|account| self.enrich_token(account, date)),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        let lamports = self
            .balances
            .native_balance(address)
            .await
            .map_err(|source| AddressProcessingError::Rpc {
                address: address.to_string(),
                method: "getBalance",
                source,
            })?;
        rows.push(self.native_row(lamports, date).await);

        Ok(rows)
    }

    async fn enrich_token(&self, account: &TokenAccountBalance, date: &str) -> Option<OutputRow> {
        let details = self.metadata.resolve(&account.mint).await;
        let balance = TokenBalance::token(account.mint.as_str(), account.amount, details);

        if !self.filter.keep_resolved(&balance) {
            logger::debug(
                LogTag::Export,
                &format!("Skipping unknown token {} ({})", balance.mint, balance.amount),
            );
            return None;
        }

        let coin_id = self
            .coin_list
            .resolve_id_by_symbol_or_address(&balance.symbol, &balance.mint);
        let price = self.prices.resolve(&coin_id, date).await;

        Some(OutputRow {
            balance,
            coingecko_id: known(coin_id),
            price,
        })
    }

    async fn native_row(&self, lamports: u64, date: &str) -> OutputRow {
        let price = self.prices.resolve(&self.native_price_id, date).await;
        OutputRow {
            balance: TokenBalance {
                mint: NATIVE_MINT.to_string(),
                amount: lamports_to_sol(lamports),
                name: NATIVE_NAME.to_string(),
                symbol: NATIVE_SYMBOL.to_string(),
                kind: TokenKind::Native,
            },
            coingecko_id: known(self.native_price_id.clone()),
            price,
        }
    }
}

fn known(id: String) -> Option<String> {
    if id == UNKNOWN {
        None
    } else {
        Some(id)
    }
}
