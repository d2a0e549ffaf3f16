//! Governance types
//!
//! Proposals are exchanged as JSON on the `custom/gov/...` paths, so these
//! types carry explicit serde field names.

use super::Coins;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProposalKind {
    #[default]
    Nil,
    Text,
    ParameterChange,
    SoftwareUpgrade,
    ListTradingPair,
    FeeChange,
    CreateValidator,
    RemoveValidator,
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ProposalKind::Nil => "Nil",
            ProposalKind::Text => "Text",
            ProposalKind::ParameterChange => "ParameterChange",
            ProposalKind::SoftwareUpgrade => "SoftwareUpgrade",
            ProposalKind::ListTradingPair => "ListTradingPair",
            ProposalKind::FeeChange => "FeeChange",
            ProposalKind::CreateValidator => "CreateValidator",
            ProposalKind::RemoveValidator => "RemoveValidator",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[default]
    Nil,
    DepositPeriod,
    VotingPeriod,
    Passed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TallyResult {
    #[serde(default)]
    pub yes: i64,
    #[serde(default)]
    pub abstain: i64,
    #[serde(default)]
    pub no: i64,
    #[serde(default)]
    pub no_with_veto: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: i64,
    pub title: String,
    pub description: String,
    pub proposal_type: ProposalKind,
    pub proposal_status: ProposalStatus,
    #[serde(default)]
    pub tally_result: TallyResult,
    pub submit_time: DateTime<Utc>,
    #[serde(default)]
    pub total_deposit: Coins,
    pub voting_start_time: Option<DateTime<Utc>>,
    /// Nanoseconds
    #[serde(default)]
    pub voting_period: i64,
}

/// Request body of `custom/gov/proposals`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryProposalsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_status: Option<ProposalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_latest_proposals: Option<i64>,
}

impl QueryProposalsParams {
    /// `Nil` status and non-positive counts mean "no filter"
    pub fn new(status: ProposalStatus, num_latest: i64) -> Self {
        Self {
            proposal_status: (status != ProposalStatus::Nil).then_some(status),
            num_latest_proposals: (num_latest > 0).then_some(num_latest),
        }
    }
}

/// Request body of `custom/gov/proposal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProposalParams {
    pub proposal_id: i64,
}
