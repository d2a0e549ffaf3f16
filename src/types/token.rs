use super::{AccAddress, Fixed8};
use serde::{Deserialize, Serialize};

/// Registered token, as stored under `tokens/info/{symbol}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    pub original_symbol: String,
    pub total_supply: Fixed8,
    pub owner: AccAddress,
    pub mintable: bool,
}

/// Per-symbol balance. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub free: Fixed8,
    pub locked: Fixed8,
    pub frozen: Fixed8,
}

impl TokenBalance {
    pub fn zero(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            free: Fixed8::ZERO,
            locked: Fixed8::ZERO,
            frozen: Fixed8::ZERO,
        }
    }
}
