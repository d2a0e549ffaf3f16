//! Governance proposal submission
//!
//! A synchronous submission that the node accepted must carry the new
//! proposal id as ASCII decimal in the commit data; anything else is a
//! `ResultParse` error even though the transaction itself went through.
//! Asynchronous submissions never look at the data and report id 0, which
//! means "unknown", not "proposal zero".

use super::{BroadcastOptions, KeyManager, TxClient};
use crate::codec::Codec;
use crate::error::{ClientError, CodecError, Result};
use crate::msg::{ListTradingPairParams, Msg, SubmitProposalMsg};
use crate::rpc::{BroadcastMode, NodeTransport, TxCommitResult};
use crate::types::ProposalKind;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitProposalResult {
    pub commit: TxCommitResult,
    /// 0 for asynchronous submissions
    pub proposal_id: i64,
}

/// Strict: no trimming, no sign tolerance beyond what `i64` parsing allows
pub fn parse_proposal_id(data: &[u8]) -> Result<i64> {
    let text = String::from_utf8_lossy(data);
    text.parse::<i64>().map_err(|source| ClientError::ResultParse {
        data: text.into_owned(),
        source,
    })
}

impl<T: NodeTransport, K: KeyManager, C: Codec> TxClient<T, K, C> {
    /// `initial_deposit` is in the native token
    #[allow(clippy::too_many_arguments)]
    pub async fn submit_proposal(
        &self,
        title: &str,
        description: &str,
        kind: ProposalKind,
        initial_deposit: i64,
        voting_period: Duration,
        sync: bool,
        options: &BroadcastOptions,
    ) -> Result<SubmitProposalResult> {
        let msg = SubmitProposalMsg::new(
            title,
            description,
            kind,
            self.address(),
            initial_deposit,
            voting_period,
        );
        msg.validate_basic()?;

        let commit = self
            .broadcast_msg(
                Msg::SubmitProposal(msg),
                BroadcastMode::from_sync_flag(sync),
                options,
            )
            .await?;

        // broadcast_msg only returns accepted commits
        let proposal_id = if sync {
            let id = parse_proposal_id(&commit.data)?;
            info!("Proposal {} submitted in tx {}", id, commit.hash);
            id
        } else {
            0
        };

        Ok(SubmitProposalResult {
            commit,
            proposal_id,
        })
    }

    /// `ListTradingPair` proposal whose description is `params` as JSON
    pub async fn submit_list_pair_proposal(
        &self,
        title: &str,
        params: &ListTradingPairParams,
        initial_deposit: i64,
        voting_period: Duration,
        sync: bool,
        options: &BroadcastOptions,
    ) -> Result<SubmitProposalResult> {
        let description = serde_json::to_string(params).map_err(CodecError::from)?;
        self.submit_proposal(
            title,
            &description,
            ProposalKind::ListTradingPair,
            initial_deposit,
            voting_period,
            sync,
            options,
        )
        .await
    }
}
