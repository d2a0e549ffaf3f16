//! Typed Accessors
//!
//! One method per domain query. Every method runs the same pipeline and
//! stops at the first failure:
//!     validate → build key/path → query → decode
//!
//! Decode conventions:
//!     length-prefixed binary — tokens, orders, pairs, order book, fees
//!     bare binary            — account
//!     JSON                   — governance
//!
//! Absent bytes are never a decode error: list accessors return an empty
//! Vec, single-object accessors return `None`.

use super::store::{StoreKey, StoreQueryClient};
use super::transport::{NodeTransport, QueryResult};
use super::validate::{
    validate_limit, validate_offset, validate_page, validate_pair, validate_symbol,
    validate_tx_search_query,
};
use crate::codec::{BinaryCodec, Codec};
use crate::error::{ClientError, Result, ValidationError};
use crate::msg::{decode_tx, TxInfo};
use crate::types::{
    AccAddress, Account, ChainNetwork, FeeParam, OpenOrder, OrderBook, Proposal, ProposalStatus,
    QueryProposalParams, QueryProposalsParams, Token, TokenBalance, TradingPair,
};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const PATH_PROPOSALS: &str = "custom/gov/proposals";
pub const PATH_PROPOSAL: &str = "custom/gov/proposal";

/// Read-only accessors over one node. Holds no mutable state; concurrent
/// calls through `&self` are safe.
#[derive(Debug, Clone)]
pub struct DexClient<T, C = BinaryCodec> {
    store: StoreQueryClient<T>,
    codec: C,
    network: ChainNetwork,
}

impl<T: NodeTransport> DexClient<T, BinaryCodec> {
    pub fn new(transport: T, network: ChainNetwork) -> Self {
        Self::with_codec(transport, BinaryCodec, network)
    }
}

impl<T: NodeTransport, C: Codec> DexClient<T, C> {
    pub fn with_codec(transport: T, codec: C, network: ChainNetwork) -> Self {
        Self {
            store: StoreQueryClient::new(transport),
            codec,
            network,
        }
    }

    pub fn network(&self) -> ChainNetwork {
        self.network
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn store(&self) -> &StoreQueryClient<T> {
        &self.store
    }

    // ── Transactions ─────────────────────────────────────────────────

    pub async fn tx_search(
        &self,
        query: &str,
        prove: bool,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<TxInfo>> {
        validate_tx_search_query(query)?;
        validate_page(page)?;
        validate_limit(per_page)?;
        let page = u32::try_from(page).map_err(|_| ValidationError::PageOutOfRange(page))?;
        // bounded by MAX_PAGE_SIZE above
        let per_page = per_page as u32;

        let rows = self
            .store
            .transport()
            .tx_search(query, prove, page, per_page)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TxInfo {
                    tx: decode_tx(&self.codec, &row.tx)?,
                    hash: row.hash,
                    height: row.height,
                    result: row.result,
                })
            })
            .collect()
    }

    // ── Tokens ───────────────────────────────────────────────────────

    pub async fn list_all_tokens(&self, offset: i64, limit: i64) -> Result<Vec<Token>> {
        validate_offset(offset)?;
        validate_limit(limit)?;
        let res = self
            .custom(&format!("tokens/list/{}/{}", offset, limit), None)
            .await?;
        self.decode_list(res)
    }

    pub async fn get_token_info(&self, symbol: &str) -> Result<Option<Token>> {
        validate_symbol(symbol)?;
        let res = self.custom(&format!("tokens/info/{}", symbol), None).await?;
        self.decode_prefixed_opt(res)
    }

    // ── Accounts ─────────────────────────────────────────────────────

    pub async fn get_account(&self, addr: &AccAddress) -> Result<Option<Account>> {
        let res = self.store.query(&StoreKey::account(addr), None).await?;
        match res.bytes {
            Some(bz) => Ok(Some(self.codec.decode_bare(&bz)?)),
            None => Ok(None),
        }
    }

    /// One entry per registered denom held by the account, in the account's
    /// coin order. Each denom costs one existence lookup.
    pub async fn get_balances(&self, addr: &AccAddress) -> Result<Vec<TokenBalance>> {
        let account = match self.get_account(addr).await? {
            Some(account) => account,
            None => return Ok(Vec::new()),
        };

        let mut seen: Vec<&str> = Vec::new();
        let mut balances = Vec::new();
        for denom in account.coins().denoms() {
            if seen.contains(&denom) {
                continue;
            }
            seen.push(denom);

            if self.token_exists(denom).await? {
                balances.push(account.balance_of(denom));
            } else {
                debug!("get_balances: skipping unregistered denom {}", denom);
            }
        }
        Ok(balances)
    }

    /// Fails with `SymbolNotFound` before the account is read when the
    /// token is not registered. An absent account yields a zero balance.
    pub async fn get_balance(&self, addr: &AccAddress, symbol: &str) -> Result<TokenBalance> {
        validate_symbol(symbol)?;
        if !self.token_exists(symbol).await? {
            return Err(ClientError::SymbolNotFound(symbol.to_string()));
        }
        Ok(self
            .get_account(addr)
            .await?
            .map(|account| account.balance_of(symbol))
            .unwrap_or_else(|| TokenBalance::zero(symbol)))
    }

    // ── Params ───────────────────────────────────────────────────────

    pub async fn get_fee(&self) -> Result<Vec<FeeParam>> {
        let res = self.store.query(&StoreKey::params("fees"), None).await?;
        self.decode_list(res)
    }

    // ── DEX ──────────────────────────────────────────────────────────

    pub async fn get_open_orders(&self, addr: &AccAddress, pair: &str) -> Result<Vec<OpenOrder>> {
        validate_pair(pair)?;
        let path = format!(
            "dex/openorders/{}/{}",
            pair,
            self.network.format_address(addr)
        );
        let res = self.custom(&path, None).await?;
        self.decode_list(res)
    }

    pub async fn get_trading_pairs(&self, offset: i64, limit: i64) -> Result<Vec<TradingPair>> {
        validate_limit(limit)?;
        validate_offset(offset)?;
        let res = self
            .custom(&format!("dex/pairs/{}/{}", offset, limit), None)
            .await?;
        self.decode_list(res)
    }

    pub async fn get_depth(&self, pair: &str) -> Result<Option<OrderBook>> {
        validate_pair(pair)?;
        let res = self.custom(&format!("dex/orderbook/{}", pair), None).await?;
        self.decode_prefixed_opt(res)
    }

    // ── Governance ───────────────────────────────────────────────────

    /// `Nil` status and `num_latest <= 0` mean no filter
    pub async fn get_proposals(
        &self,
        status: ProposalStatus,
        num_latest: i64,
    ) -> Result<Vec<Proposal>> {
        let params = self
            .codec
            .encode_json(&QueryProposalsParams::new(status, num_latest))?;
        let res = self.custom(PATH_PROPOSALS, Some(&params)).await?;
        match res.bytes {
            Some(bz) => Ok(self.codec.decode_json(&bz)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn get_proposal(&self, proposal_id: i64) -> Result<Option<Proposal>> {
        let params = self
            .codec
            .encode_json(&QueryProposalParams { proposal_id })?;
        let res = self.custom(PATH_PROPOSAL, Some(&params)).await?;
        match res.bytes {
            Some(bz) => Ok(Some(self.codec.decode_json(&bz)?)),
            None => Ok(None),
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Existence lookup keyed by the upper-cased symbol. Transport errors
    /// propagate; they are not read as "absent".
    async fn token_exists(&self, symbol: &str) -> Result<bool> {
        let res = self.store.query(&StoreKey::token(symbol), None).await?;
        Ok(res.bytes.is_some())
    }

    async fn custom(&self, path: &str, request: Option<&[u8]>) -> Result<QueryResult> {
        Ok(self.store.query(&StoreKey::custom(path), request).await?)
    }

    fn decode_list<V: DeserializeOwned>(&self, res: QueryResult) -> Result<Vec<V>> {
        match res.bytes {
            Some(bz) => Ok(self.codec.decode_length_prefixed(&bz)?),
            None => Ok(Vec::new()),
        }
    }

    fn decode_prefixed_opt<V: DeserializeOwned>(&self, res: QueryResult) -> Result<Option<V>> {
        match res.bytes {
            Some(bz) => Ok(Some(self.codec.decode_length_prefixed(&bz)?)),
            None => Ok(None),
        }
    }
}
