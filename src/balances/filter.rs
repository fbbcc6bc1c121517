/// Row filters applied during aggregation
use crate::config::ExportConfig;
use crate::tokens::types::{TokenAccountBalance, TokenBalance, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceFilter {
    /// Drop token balances of exactly 0 or 1 before any lookup
    pub skip_dust_balances: bool,
    /// Drop token rows whose resolved name is Unknown before the price lookup
    pub skip_unknown_tokens: bool,
}

impl Default for BalanceFilter {
    fn default() -> Self {
        Self {
            skip_dust_balances: true,
            skip_unknown_tokens: true,
        }
    }
}

impl BalanceFilter {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            skip_dust_balances: config.skip_dust_balances,
            skip_unknown_tokens: config.skip_unknown_tokens,
        }
    }

    pub fn is_dust(amount: f64) -> bool {
        amount == 0.0 || amount == 1.0
    }

    pub fn keep_amount(&self, amount: f64) -> bool {
        !(self.skip_dust_balances && Self::is_dust(amount))
    }

    /// Native rows always pass
    pub fn keep_resolved(&self, balance: &TokenBalance) -> bool {
        balance.kind == TokenKind::Native || !(self.skip_unknown_tokens && balance.is_unknown())
    }

    pub fn apply_dust(&self, balances: Vec<TokenAccountBalance>) -> Vec<TokenAccountBalance> {
        balances
            .into_iter()
            .filter(|balance| self.keep_amount(balance.amount))
            .collect()
    }
}
