//! Governance proposal message
//!
//! Well-formedness rules:
//!     title        1..=128 bytes
//!     description  1..=2048 bytes
//!     kind         anything but Nil
//!     proposer     non-zero address
//!     deposit      valid coin set (non-empty denoms, positive, sorted, unique)
//!     voting       (0, 14 days]

use crate::error::MsgError;
use crate::types::{AccAddress, Coin, Coins, ProposalKind, NATIVE_SYMBOL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_TITLE_LENGTH: usize = 128;
pub const MAX_DESCRIPTION_LENGTH: usize = 2048;
pub const MAX_VOTING_PERIOD: Duration = Duration::from_secs(14 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProposalMsg {
    pub title: String,
    pub description: String,
    pub proposal_type: ProposalKind,
    pub proposer: AccAddress,
    pub initial_deposit: Coins,
    pub voting_period: Duration,
}

impl SubmitProposalMsg {
    /// Deposit is denominated in the native token
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        proposal_type: ProposalKind,
        proposer: AccAddress,
        initial_deposit: i64,
        voting_period: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            proposal_type,
            proposer,
            initial_deposit: Coins(vec![Coin::new(NATIVE_SYMBOL, initial_deposit)]),
            voting_period,
        }
    }

    pub fn validate_basic(&self) -> Result<(), MsgError> {
        if self.title.is_empty() {
            return Err(MsgError::TitleEmpty);
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(MsgError::TitleTooLong {
                len: self.title.len(),
                max: MAX_TITLE_LENGTH,
            });
        }
        if self.description.is_empty() {
            return Err(MsgError::DescriptionEmpty);
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(MsgError::DescriptionTooLong {
                len: self.description.len(),
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        if self.proposal_type == ProposalKind::Nil {
            return Err(MsgError::InvalidProposalKind);
        }
        if self.proposer.is_empty() {
            return Err(MsgError::ProposerEmpty);
        }
        self.initial_deposit
            .validate()
            .map_err(MsgError::InvalidDeposit)?;
        if self.voting_period.is_zero() || self.voting_period > MAX_VOTING_PERIOD {
            return Err(MsgError::VotingPeriod(self.voting_period));
        }
        Ok(())
    }
}

/// Structured description of a `ListTradingPair` proposal.
/// Serialized as JSON into the proposal's description field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTradingPairParams {
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    pub init_price: i64,
    pub description: String,
    pub expire_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SubmitProposalMsg {
        SubmitProposalMsg::new(
            "list XYZ",
            "please",
            ProposalKind::ListTradingPair,
            AccAddress([5u8; 20]),
            1_000_000_000,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_valid_proposal() {
        assert!(valid().validate_basic().is_ok());
        assert_eq!(valid().initial_deposit.amount_of(NATIVE_SYMBOL), 1_000_000_000);
    }

    #[test]
    fn test_title_bounds() {
        let mut m = valid();
        m.title.clear();
        assert_eq!(m.validate_basic(), Err(MsgError::TitleEmpty));

        m.title = "t".repeat(MAX_TITLE_LENGTH + 1);
        assert!(matches!(m.validate_basic(), Err(MsgError::TitleTooLong { .. })));
    }

    #[test]
    fn test_description_bounds() {
        let mut m = valid();
        m.description = "d".repeat(MAX_DESCRIPTION_LENGTH + 1);
        assert!(matches!(m.validate_basic(), Err(MsgError::DescriptionTooLong { .. })));
    }

    #[test]
    fn test_nil_kind_rejected() {
        let mut m = valid();
        m.proposal_type = ProposalKind::Nil;
        assert_eq!(m.validate_basic(), Err(MsgError::InvalidProposalKind));
    }

    #[test]
    fn test_zero_proposer_rejected() {
        let mut m = valid();
        m.proposer = AccAddress::default();
        assert_eq!(m.validate_basic(), Err(MsgError::ProposerEmpty));
    }

    #[test]
    fn test_deposit_must_be_positive() {
        let mut m = valid();
        m.initial_deposit = Coins(vec![Coin::new(NATIVE_SYMBOL, 0)]);
        assert!(matches!(m.validate_basic(), Err(MsgError::InvalidDeposit(_))));
    }

    #[test]
    fn test_voting_period_bounds() {
        let mut m = valid();
        m.voting_period = Duration::ZERO;
        assert!(matches!(m.validate_basic(), Err(MsgError::VotingPeriod(_))));

        m.voting_period = MAX_VOTING_PERIOD;
        assert!(m.validate_basic().is_ok());

        m.voting_period = MAX_VOTING_PERIOD + Duration::from_secs(1);
        assert!(matches!(m.validate_basic(), Err(MsgError::VotingPeriod(_))));
    }
}
