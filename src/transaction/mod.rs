//! Transaction Submitter
//!
//! Purpose:
//!     Sign and broadcast messages on behalf of one key, and turn the node's
//!     acknowledgment into either a `TxCommitResult` or a typed error.
//!
//! Architecture:
//!     mod.rs             — KeyManager contract, TxClient, broadcast plumbing
//!     submit_proposal.rs — governance proposal submission + proposal id parsing
//!
//! Flow (broadcast_msg):
//!     validate_basic → account number/sequence (pinned or fetched)
//!         → StdSignMsg → KeyManager::sign → broadcast → commit check
//!
//! Signing itself is external: the KeyManager returns the fully encoded,
//! signed transaction bytes.

pub mod submit_proposal;

pub use submit_proposal::SubmitProposalResult;

use crate::codec::{BinaryCodec, Codec};
use crate::error::{ClientError, Result, SignerError};
use crate::msg::{Msg, StdSignMsg};
use crate::rpc::{BroadcastMode, DexClient, NodeTransport, TxCommitResult};
use crate::types::{AccAddress, ChainNetwork};
use std::sync::Arc;
use tracing::{info, warn};

/// External signer bound to one account
pub trait KeyManager: Send + Sync {
    fn address(&self) -> AccAddress;

    /// Fully encoded, signed transaction for `msg`
    fn sign(&self, msg: &StdSignMsg) -> std::result::Result<Vec<u8>, SignerError>;
}

impl<K: KeyManager + ?Sized> KeyManager for Arc<K> {
    fn address(&self) -> AccAddress {
        (**self).address()
    }

    fn sign(&self, msg: &StdSignMsg) -> std::result::Result<Vec<u8>, SignerError> {
        (**self).sign(msg)
    }
}

/// Memo/source tagging plus optional pinned account number and sequence.
/// Unpinned values are read from the signer's account before signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOptions {
    pub memo: String,
    pub source: i64,
    pub account_number: Option<i64>,
    pub sequence: Option<i64>,
}

impl BroadcastOptions {
    pub fn new(memo: impl Into<String>, source: i64) -> Self {
        Self {
            memo: memo.into(),
            source,
            ..Default::default()
        }
    }

    pub fn with_account(mut self, account_number: i64, sequence: i64) -> Self {
        self.account_number = Some(account_number);
        self.sequence = Some(sequence);
        self
    }
}

pub struct TxClient<T, K, C = BinaryCodec> {
    query: DexClient<T, C>,
    key_manager: K,
    chain_id: String,
}

impl<T: NodeTransport, K: KeyManager> TxClient<T, K, BinaryCodec> {
    /// Chain id defaults to the network's
    pub fn new(transport: T, network: ChainNetwork, key_manager: K) -> Self {
        Self {
            query: DexClient::new(transport, network),
            key_manager,
            chain_id: network.default_chain_id().to_string(),
        }
    }
}

impl<T: NodeTransport, K: KeyManager, C: Codec> TxClient<T, K, C> {
    pub fn from_query_client(query: DexClient<T, C>, key_manager: K, chain_id: impl Into<String>) -> Self {
        Self {
            query,
            key_manager,
            chain_id: chain_id.into(),
        }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    pub fn query(&self) -> &DexClient<T, C> {
        &self.query
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn address(&self) -> AccAddress {
        self.key_manager.address()
    }

    /// Validate, sign and broadcast one message.
    ///
    /// A node rejection (`ok == false`) is returned as
    /// `ClientError::CommitFailure` in both modes.
    pub async fn broadcast_msg(
        &self,
        msg: Msg,
        mode: BroadcastMode,
        options: &BroadcastOptions,
    ) -> Result<TxCommitResult> {
        msg.validate_basic()?;

        let (account_number, sequence) = self.account_meta(options).await?;
        let sign_msg = StdSignMsg {
            chain_id: self.chain_id.clone(),
            account_number,
            sequence,
            memo: options.memo.clone(),
            msgs: vec![msg],
            source: options.source,
            data: Vec::new(),
        };

        let tx = self.key_manager.sign(&sign_msg)?;
        let commit = self
            .query
            .store()
            .transport()
            .broadcast_tx(&tx, mode)
            .await?;

        if !commit.ok {
            warn!(
                "Broadcast rejected: hash={} code={} log={}",
                commit.hash, commit.code, commit.log
            );
            return Err(ClientError::CommitFailure {
                code: commit.code,
                log: commit.log,
                hash: commit.hash,
            });
        }

        info!(
            "Broadcast accepted ({:?}): hash={} height={}",
            mode, commit.hash, commit.height
        );
        Ok(commit)
    }

    async fn account_meta(&self, options: &BroadcastOptions) -> Result<(i64, i64)> {
        if let (Some(number), Some(sequence)) = (options.account_number, options.sequence) {
            return Ok((number, sequence));
        }

        let addr = self.address();
        let account = self.query.get_account(&addr).await?.ok_or_else(|| {
            ClientError::AccountNotFound(self.query.network().format_address(&addr))
        })?;

        Ok((
            options.account_number.unwrap_or(account.account_number()),
            options.sequence.unwrap_or(account.sequence()),
        ))
    }
}

/// Signer double: "signs" by attaching an empty signature that records the
/// account number and sequence it was asked to sign for.
#[cfg(test)]
pub(crate) struct FixedKeyManager(pub AccAddress);

#[cfg(test)]
impl KeyManager for FixedKeyManager {
    fn address(&self) -> AccAddress {
        self.0
    }

    fn sign(&self, msg: &StdSignMsg) -> std::result::Result<Vec<u8>, SignerError> {
        let codec = BinaryCodec;
        let mut tx = msg
            .to_std_tx(&codec)
            .map_err(|e| SignerError(e.to_string()))?;
        tx.signatures.push(crate::msg::StdSignature {
            pub_key: Vec::new(),
            signature: Vec::new(),
            account_number: msg.account_number,
            sequence: msg.sequence,
        });
        tx.encode(&codec).map_err(|e| SignerError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::{StdTx, TokenIssueMsg};
    use crate::rpc::mock::MockTransport;
    use crate::rpc::store::StoreKey;
    use crate::types::{Account, BaseAccount, Coin, Coins, Fixed8};

    struct FailingKeyManager;

    impl KeyManager for FailingKeyManager {
        fn address(&self) -> AccAddress {
            AccAddress([1u8; 20])
        }

        fn sign(&self, _msg: &StdSignMsg) -> std::result::Result<Vec<u8>, SignerError> {
            Err(SignerError("hardware wallet locked".into()))
        }
    }

    fn signer() -> AccAddress {
        AccAddress([8u8; 20])
    }

    fn issue_msg() -> Msg {
        Msg::TokenIssue(TokenIssueMsg {
            from: signer(),
            name: "Example".into(),
            symbol: "EXM".into(),
            total_supply: Fixed8(1_000),
            mintable: false,
        })
    }

    fn ok_commit() -> TxCommitResult {
        TxCommitResult {
            ok: true,
            hash: "C0FFEE".into(),
            height: 10,
            ..Default::default()
        }
    }

    fn client(mock: &Arc<MockTransport>) -> TxClient<Arc<MockTransport>, FixedKeyManager> {
        TxClient::new(Arc::clone(mock), ChainNetwork::Testnet, FixedKeyManager(signer()))
    }

    #[tokio::test]
    async fn test_pinned_account_skips_lookup() {
        let mock = Arc::new(MockTransport::new());
        mock.set_commit(ok_commit());
        let client = client(&mock);

        let commit = client
            .broadcast_msg(
                issue_msg(),
                BroadcastMode::Async,
                &BroadcastOptions::new("memo", 3).with_account(5, 6),
            )
            .await
            .unwrap();
        assert_eq!(commit.hash, "C0FFEE");
        assert!(mock.calls().is_empty());

        let broadcasts = mock.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].1, BroadcastMode::Async);
        let tx: StdTx = BinaryCodec.decode_length_prefixed(&broadcasts[0].0).unwrap();
        assert_eq!(tx.memo, "memo");
        assert_eq!(tx.source, 3);
        assert_eq!(tx.signatures[0].account_number, 5);
        assert_eq!(tx.signatures[0].sequence, 6);
    }

    #[tokio::test]
    async fn test_account_meta_fetched_when_unpinned() {
        let mock = Arc::new(MockTransport::new());
        mock.set_commit(ok_commit());
        let account = Account::Plain(BaseAccount {
            address: signer(),
            coins: Coins(vec![Coin::new("BNB", 1)]),
            account_number: 77,
            sequence: 12,
        });
        mock.respond(
            "/store/acc/key",
            StoreKey::account(&signer()).raw_key(),
            Some(BinaryCodec.encode_bare(&account).unwrap()),
        );

        client(&mock)
            .broadcast_msg(issue_msg(), BroadcastMode::Sync, &BroadcastOptions::default())
            .await
            .unwrap();

        let tx: StdTx = BinaryCodec
            .decode_length_prefixed(&mock.broadcasts()[0].0)
            .unwrap();
        assert_eq!(tx.signatures[0].account_number, 77);
        assert_eq!(tx.signatures[0].sequence, 12);
    }

    #[tokio::test]
    async fn test_absent_account_is_error() {
        let mock = Arc::new(MockTransport::new());
        let err = client(&mock)
            .broadcast_msg(issue_msg(), BroadcastMode::Sync, &BroadcastOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::AccountNotFound(ref a) if a.starts_with("tbnb1")));
        assert!(mock.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_commit_is_commit_failure() {
        let mock = Arc::new(MockTransport::new());
        mock.set_commit(TxCommitResult {
            ok: false,
            code: 65541,
            log: "insufficient fee".into(),
            hash: "BAD".into(),
            ..Default::default()
        });
        let options = BroadcastOptions::default().with_account(0, 0);

        for mode in [BroadcastMode::Sync, BroadcastMode::Async] {
            let err = client(&mock)
                .broadcast_msg(issue_msg(), mode, &options)
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::CommitFailure { code: 65541, .. }));
        }
    }

    #[tokio::test]
    async fn test_signer_error_propagates() {
        let mock = Arc::new(MockTransport::new());
        let client = TxClient::new(Arc::clone(&mock), ChainNetwork::Prod, FailingKeyManager);
        let err = client
            .broadcast_msg(
                issue_msg(),
                BroadcastMode::Sync,
                &BroadcastOptions::default().with_account(0, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
        assert!(mock.broadcasts().is_empty());
    }

    #[test]
    fn test_default_chain_id() {
        let mock = Arc::new(MockTransport::new());
        assert_eq!(client(&mock).chain_id(), "Binance-Chain-Ganges");
        assert_eq!(client(&mock).with_chain_id("local").chain_id(), "local");
    }
}
