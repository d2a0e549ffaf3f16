// Core data structures shared by the query client, the submitter and the monitor.
// Payload types (tokens, orders, fees, proposals) live in the submodules.

pub mod account;
pub mod dex;
pub mod fee;
pub mod gov;
pub mod token;

pub use account::{Account, AppAccount, BaseAccount};
pub use dex::{OpenOrder, OrderBook, OrderBookLevel, TradingPair};
pub use fee::{DexFeeField, FeeDistributeType, FeeParam};
pub use gov::{
    ProposalKind, ProposalStatus, Proposal, QueryProposalParams, QueryProposalsParams,
    TallyResult,
};
pub use token::{Token, TokenBalance};

use bech32::{Bech32, Hrp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbol of the chain's native token
pub const NATIVE_SYMBOL: &str = "BNB";

/// Byte length of an account address
pub const ADDR_LEN: usize = 20;

/// Network profile: selects the bech32 prefix and default chain id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainNetwork {
    Prod,
    Testnet,
}

impl ChainNetwork {
    pub fn bech32_prefix(&self) -> &'static str {
        match self {
            ChainNetwork::Prod => "bnb",
            ChainNetwork::Testnet => "tbnb",
        }
    }

    pub fn default_chain_id(&self) -> &'static str {
        match self {
            ChainNetwork::Prod => "Binance-Chain-Tigris",
            ChainNetwork::Testnet => "Binance-Chain-Ganges",
        }
    }

    /// Render an address with this network's prefix.
    /// Falls back to upper-case hex if bech32 encoding is impossible.
    pub fn format_address(&self, addr: &AccAddress) -> String {
        addr.to_bech32(self.bech32_prefix())
            .unwrap_or_else(|_| addr.to_string())
    }
}

impl fmt::Display for ChainNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainNetwork::Prod => write!(f, "prod"),
            ChainNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for ChainNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prod" | "mainnet" => Ok(ChainNetwork::Prod),
            "testnet" => Ok(ChainNetwork::Testnet),
            other => Err(format!("unknown network '{}' (expected prod or testnet)", other)),
        }
    }
}

/// 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccAddress(pub [u8; ADDR_LEN]);

impl AccAddress {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let arr: [u8; ADDR_LEN] = bytes
            .try_into()
            .map_err(|_| format!("address must be {} bytes, got {}", ADDR_LEN, bytes.len()))?;
        Ok(Self(arr))
    }

    /// Parse a bech32 address, returning it together with its prefix
    pub fn from_bech32(s: &str) -> Result<(Self, String), String> {
        let (hrp, data) = bech32::decode(s).map_err(|e| format!("invalid bech32 address: {}", e))?;
        Ok((Self::from_slice(&data)?, hrp.as_str().to_string()))
    }

    pub fn to_bech32(&self, prefix: &str) -> Result<String, String> {
        let hrp = Hrp::parse(prefix).map_err(|e| format!("invalid prefix '{}': {}", prefix, e))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| e.to_string())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// All-zero address (never a valid signer)
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl fmt::Debug for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AccAddress({})", self)
    }
}

/// Signed 64-bit fixed-point quantity with 8 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed8(pub i64);

impl Fixed8 {
    pub const DECIMALS: u32 = 8;
    pub const ZERO: Fixed8 = Fixed8(0);

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, Self::DECIMALS)
    }
}

impl From<i64> for Fixed8 {
    fn from(v: i64) -> Self {
        Fixed8(v)
    }
}

impl fmt::Display for Fixed8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: i64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: i64) -> Self {
        Self { denom: denom.into(), amount }
    }
}

/// Coin set. A denom absent from the set has amount zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(pub Vec<Coin>);

impl Coins {
    pub fn amount_of(&self, denom: &str) -> i64 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.denom.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Non-empty denoms, positive amounts, strictly ascending by denom
    pub fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("no coins".to_string());
        }
        for (i, coin) in self.0.iter().enumerate() {
            if coin.denom.is_empty() {
                return Err(format!("coin {} has an empty denom", i));
            }
            if coin.amount <= 0 {
                return Err(format!("{} amount {} is not positive", coin.denom, coin.amount));
            }
            if i > 0 && self.0[i - 1].denom >= coin.denom {
                return Err(format!("coins are not sorted or contain duplicate {}", coin.denom));
            }
        }
        Ok(())
    }
}

impl From<Vec<Coin>> for Coins {
    fn from(coins: Vec<Coin>) -> Self {
        Coins(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bech32_round_trip() {
        let addr = AccAddress([7u8; ADDR_LEN]);
        let s = ChainNetwork::Testnet.format_address(&addr);
        assert!(s.starts_with("tbnb1"));

        let (parsed, prefix) = AccAddress::from_bech32(&s).unwrap();
        assert_eq!(parsed, addr);
        assert_eq!(prefix, "tbnb");
    }

    #[test]
    fn test_address_wrong_length() {
        assert!(AccAddress::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_fixed8_display() {
        assert_eq!(Fixed8(150_000_000).to_string(), "1.50000000");
        assert_eq!(Fixed8(-1).to_string(), "-0.00000001");
    }

    #[test]
    fn test_fixed8_to_decimal() {
        use rust_decimal_macros::dec;
        assert_eq!(Fixed8(150_000_000).to_decimal(), dec!(1.5));
        assert_eq!(Fixed8(1).to_decimal(), dec!(0.00000001));
        assert_eq!(Fixed8::ZERO.to_decimal(), dec!(0));
    }

    #[test]
    fn test_absent_denom_is_zero() {
        let coins = Coins(vec![Coin::new("BNB", 10)]);
        assert_eq!(coins.amount_of("BNB"), 10);
        assert_eq!(coins.amount_of("XYZ-000"), 0);
    }

    #[test]
    fn test_coins_validate() {
        assert!(Coins(vec![Coin::new("AAA-000", 1), Coin::new("BNB", 5)]).validate().is_ok());
        assert!(Coins(vec![Coin::new("BNB", 5), Coin::new("AAA-000", 1)]).validate().is_err());
        assert!(Coins(vec![Coin::new("BNB", 0)]).validate().is_err());
        assert!(Coins::default().validate().is_err());
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("PROD".parse::<ChainNetwork>().unwrap(), ChainNetwork::Prod);
        assert_eq!("testnet".parse::<ChainNetwork>().unwrap(), ChainNetwork::Testnet);
        assert!("devnet".parse::<ChainNetwork>().is_err());
    }
}
