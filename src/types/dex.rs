// DEX payloads returned by the `dex/...` query paths

use super::Fixed8;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub id: String,
    pub symbol: String,
    pub price: Fixed8,
    pub quantity: Fixed8,
    pub cumulate_quantity: Fixed8,
    pub created_height: i64,
    pub created_timestamp: i64,
    pub last_updated_height: i64,
    pub last_updated_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingPair {
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    pub list_price: Fixed8,
    pub tick_size: Fixed8,
    pub lot_size: Fixed8,
}

impl TradingPair {
    /// `BASE_QUOTE` form used by the pair query paths
    pub fn symbol(&self) -> String {
        format!("{}_{}", self.base_asset_symbol, self.quote_asset_symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub buy_qty: Fixed8,
    pub buy_price: Fixed8,
    pub sell_qty: Fixed8,
    pub sell_price: Fixed8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderBook {
    pub height: i64,
    pub levels: Vec<OrderBookLevel>,
}

impl OrderBook {
    /// Best bid/ask prices from the first level, if any
    pub fn top_of_book(&self) -> Option<(Fixed8, Fixed8)> {
        self.levels.first().map(|l| (l.buy_price, l.sell_price))
    }
}
