//! Account variants
//!
//! A plain account holds free coins only; a named (app) account also tracks
//! locked and frozen coin subsets. Callers branch on the capability
//! (`locked_frozen()`), never on the concrete variant.

use super::{AccAddress, Coins, Fixed8, TokenBalance};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseAccount {
    pub address: AccAddress,
    pub coins: Coins,
    pub account_number: i64,
    pub sequence: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppAccount {
    pub base: BaseAccount,
    pub name: String,
    pub frozen_coins: Coins,
    pub locked_coins: Coins,
    pub flags: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Account {
    Plain(BaseAccount),
    Named(AppAccount),
}

impl Account {
    fn base(&self) -> &BaseAccount {
        match self {
            Account::Plain(base) => base,
            Account::Named(app) => &app.base,
        }
    }

    pub fn address(&self) -> AccAddress {
        self.base().address
    }

    /// Free coins
    pub fn coins(&self) -> &Coins {
        &self.base().coins
    }

    pub fn account_number(&self) -> i64 {
        self.base().account_number
    }

    pub fn sequence(&self) -> i64 {
        self.base().sequence
    }

    /// `(locked, frozen)` when the account tracks them
    pub fn locked_frozen(&self) -> Option<(&Coins, &Coins)> {
        match self {
            Account::Plain(_) => None,
            Account::Named(app) => Some((&app.locked_coins, &app.frozen_coins)),
        }
    }

    /// Balance of one denom. Locked/frozen are zero for a plain account.
    pub fn balance_of(&self, symbol: &str) -> TokenBalance {
        let (locked, frozen) = self
            .locked_frozen()
            .map(|(locked, frozen)| (locked.amount_of(symbol), frozen.amount_of(symbol)))
            .unwrap_or((0, 0));

        TokenBalance {
            symbol: symbol.to_string(),
            free: Fixed8(self.coins().amount_of(symbol)),
            locked: Fixed8(locked),
            frozen: Fixed8(frozen),
        }
    }
}
