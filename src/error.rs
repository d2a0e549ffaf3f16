//! Error Taxonomy
//!
//! One `thiserror` enum per layer, unified by [`ClientError`] for the
//! accessor and submitter surface.
//!
//! ```text
//! ValidationError  — client-side parameter checks, never sent over the wire
//! TransportError   — node / network failures, not retried here
//! CodecError       — bytes present but not decodable under the expected schema
//! MsgError         — malformed transaction message (pre-signing)
//! SignerError      — external signer failure
//! ```

use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Pre-query validation failure. Identifies which constraint failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("offset {0} is out of range, must be >= 0")]
    OffsetOutOfRange(i64),

    #[error("limit {limit} is out of range, must be within [1, {max}]")]
    LimitOutOfRange { limit: i64, max: i64 },

    #[error("page {0} is out of range, must be >= 1")]
    PageOutOfRange(i64),

    #[error("invalid symbol {symbol:?}: {reason}")]
    Symbol { symbol: String, reason: &'static str },

    #[error("invalid trading pair {0:?}: expected BASE_QUOTE")]
    PairFormat(String),

    #[error("search query is {len} bytes, exceeds maximum of {max}")]
    QueryTooLong { len: usize, max: usize },

    #[error("invalid search query: {0}")]
    QuerySyntax(String),
}

/// Network or node failure. Propagated without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered the ABCI query with a non-zero code.
    #[error("node returned code {code}: {log}")]
    Node { code: u32, log: String },

    #[error("malformed node response: {0}")]
    Malformed(String),

    #[error("websocket error: {0}")]
    Websocket(String),

    #[error("invalid node URL {0:?}")]
    InvalidUrl(String),
}

/// Encoding / decoding failure in the codec adapter.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("binary codec: {0}")]
    Binary(#[from] bincode::Error),

    #[error("json codec: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty payload")]
    Empty,

    #[error("malformed length prefix")]
    Varint,

    #[error("length prefix {declared} does not match {available} remaining bytes")]
    Length { declared: u64, available: usize },
}

/// Message well-formedness failure (checked before signing).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MsgError {
    #[error("proposal title is empty")]
    TitleEmpty,

    #[error("proposal title is {len} bytes, longer than {max}")]
    TitleTooLong { len: usize, max: usize },

    #[error("proposal description is empty")]
    DescriptionEmpty,

    #[error("proposal description is {len} bytes, longer than {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("proposal type is not set")]
    InvalidProposalKind,

    #[error("proposer address is empty")]
    ProposerEmpty,

    #[error("invalid initial deposit: {0}")]
    InvalidDeposit(String),

    #[error("voting period {0:?} must be positive and at most 14 days")]
    VotingPeriod(Duration),
}

/// Raised by a [`crate::transaction::KeyManager`] that could not sign.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signing failed: {0}")]
pub struct SignerError(pub String);

/// Error surface of every typed accessor and the transaction submitter.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ValidationError),

    #[error("query failed: {0}")]
    Query(#[from] TransportError),

    #[error("decode failed: {0}")]
    Decode(#[from] CodecError),

    #[error("invalid message: {0}")]
    InvalidMsg(#[from] MsgError),

    #[error(transparent)]
    Signing(#[from] SignerError),

    /// Business rule: the symbol is not a registered token.
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Transport succeeded but the node rejected the transaction.
    #[error("transaction {hash} rejected with code {code}: {log}")]
    CommitFailure { code: u32, log: String, hash: String },

    /// Commit succeeded but its return data is not an ASCII decimal integer.
    #[error("cannot parse commit data {data:?} as an integer: {source}")]
    ResultParse {
        data: String,
        #[source]
        source: ParseIntError,
    },
}

/// Result alias for accessor and submitter operations
pub type Result<T> = std::result::Result<T, ClientError>;
