//! Message classification
//!
//! Total match over `Msg`. Three kinds raise an alert:
//!     TokenIssue                       — new token
//!     DexList                          — pair listed
//!     SubmitProposal(ListTradingPair)  — pair listing proposed
//! Everything else, including `Msg::Other`, is ignored.

use crate::msg::{DexListMsg, Msg, SubmitProposalMsg, TokenIssueMsg};
use crate::types::{ChainNetwork, ProposalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert<'a> {
    TokenIssued(&'a TokenIssueMsg),
    PairListed(&'a DexListMsg),
    PairListProposal(&'a SubmitProposalMsg),
}

pub fn classify(msg: &Msg) -> Option<Alert<'_>> {
    match msg {
        Msg::TokenIssue(m) => Some(Alert::TokenIssued(m)),
        Msg::DexList(m) => Some(Alert::PairListed(m)),
        Msg::SubmitProposal(m) if m.proposal_type == ProposalKind::ListTradingPair => {
            Some(Alert::PairListProposal(m))
        }
        Msg::SubmitProposal(_) => None,
        Msg::Other { .. } => None,
    }
}

impl Alert<'_> {
    /// Addresses render with `network`'s bech32 prefix; `label` names the
    /// monitored network in the text.
    pub fn render(&self, network: ChainNetwork, label: &str) -> String {
        match self {
            Alert::TokenIssued(m) => format!(
                "issue from: {}, token: {}, supply: {}, net {}",
                network.format_address(&m.from),
                m.symbol,
                m.total_supply.0,
                label
            ),
            Alert::PairListed(m) => format!(
                "list from: {}, pair: {}_{}, net {}",
                network.format_address(&m.from),
                m.base_asset_symbol,
                m.quote_asset_symbol,
                label
            ),
            Alert::PairListProposal(m) => format!(
                "list proposal: from {}, content {}, net {}",
                network.format_address(&m.proposer),
                m.description,
                label
            ),
        }
    }
}
