//! Transaction Messages
//!
//! Messages travel inside a transaction as `(route, payload)` pairs. Decoding
//! turns each pair into one variant of the closed [`Msg`] union; routes this
//! crate does not model land in `Msg::Other` so newer message kinds never
//! break decoding.
//!
//! Architecture:
//!     mod.rs      — Msg union, routes, payload structs for token issue / pair listing
//!     proposal.rs — SubmitProposalMsg + well-formedness rules, ListTradingPairParams
//!     tx.rs       — StdTx wire form, StdSignMsg, DecodedTransaction, TxInfo

pub mod proposal;
pub mod tx;

pub use proposal::{ListTradingPairParams, SubmitProposalMsg};
pub use tx::{decode_tx, DecodedTransaction, StdSignMsg, StdSignature, StdTx, TxInfo, WireMsg};

use crate::codec::Codec;
use crate::error::{CodecError, MsgError};
use crate::types::{AccAddress, Fixed8};
use serde::{Deserialize, Serialize};

// ── Routes ──────────────────────────────────────────────────────────
pub const ROUTE_TOKEN_ISSUE: &str = "tokens/IssueMsg";
pub const ROUTE_DEX_LIST: &str = "dex/ListMsg";
pub const ROUTE_SUBMIT_PROPOSAL: &str = "cosmos-sdk/MsgSubmitProposal";

/// New token issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIssueMsg {
    pub from: AccAddress,
    pub name: String,
    pub symbol: String,
    pub total_supply: Fixed8,
    pub mintable: bool,
}

/// Trading pair listing (executes a passed list proposal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexListMsg {
    pub from: AccAddress,
    pub proposal_id: i64,
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    pub init_price: Fixed8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    TokenIssue(TokenIssueMsg),
    DexList(DexListMsg),
    SubmitProposal(SubmitProposalMsg),
    /// Any route this crate does not model
    Other { route: String, value: Vec<u8> },
}

impl Msg {
    pub fn route(&self) -> &str {
        match self {
            Msg::TokenIssue(_) => ROUTE_TOKEN_ISSUE,
            Msg::DexList(_) => ROUTE_DEX_LIST,
            Msg::SubmitProposal(_) => ROUTE_SUBMIT_PROPOSAL,
            Msg::Other { route, .. } => route,
        }
    }

    /// Stateless well-formedness check run before signing
    pub fn validate_basic(&self) -> Result<(), MsgError> {
        match self {
            Msg::SubmitProposal(m) => m.validate_basic(),
            Msg::TokenIssue(_) | Msg::DexList(_) | Msg::Other { .. } => Ok(()),
        }
    }

    pub fn to_wire<C: Codec>(&self, codec: &C) -> Result<WireMsg, CodecError> {
        let value = match self {
            Msg::TokenIssue(m) => codec.encode_bare(m)?,
            Msg::DexList(m) => codec.encode_bare(m)?,
            Msg::SubmitProposal(m) => codec.encode_bare(m)?,
            Msg::Other { value, .. } => value.clone(),
        };
        Ok(WireMsg {
            route: self.route().to_string(),
            value,
        })
    }

    /// A modeled route whose payload does not decode is an error;
    /// an unknown route is not.
    pub fn from_wire<C: Codec>(wire: &WireMsg, codec: &C) -> Result<Self, CodecError> {
        let msg = match wire.route.as_str() {
            ROUTE_TOKEN_ISSUE => Msg::TokenIssue(codec.decode_bare(&wire.value)?),
            ROUTE_DEX_LIST => Msg::DexList(codec.decode_bare(&wire.value)?),
            ROUTE_SUBMIT_PROPOSAL => Msg::SubmitProposal(codec.decode_bare(&wire.value)?),
            _ => Msg::Other {
                route: wire.route.clone(),
                value: wire.value.clone(),
            },
        };
        Ok(msg)
    }
}
