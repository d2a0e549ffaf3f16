//! Transaction wire form and decoded view
//!
//! A transaction is a length-prefixed `StdTx`. `decode_tx` builds the
//! ordered message list once per event; the decoded value is consumed and
//! dropped by the caller, never stored.

use super::Msg;
use crate::codec::Codec;
use crate::error::CodecError;
use crate::rpc::transport::TxResult;
use serde::{Deserialize, Serialize};

/// One message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMsg {
    pub route: String,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub account_number: i64,
    pub sequence: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StdTx {
    pub msgs: Vec<WireMsg>,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
    pub source: i64,
    pub data: Vec<u8>,
}

impl StdTx {
    pub fn encode<C: Codec>(&self, codec: &C) -> Result<Vec<u8>, CodecError> {
        codec.encode_length_prefixed(self)
    }
}

/// Messages of one transaction, in wire order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub msgs: Vec<Msg>,
    pub memo: String,
    pub source: i64,
}

pub fn decode_tx<C: Codec>(codec: &C, bz: &[u8]) -> Result<DecodedTransaction, CodecError> {
    let tx: StdTx = codec.decode_length_prefixed(bz)?;
    let msgs = tx
        .msgs
        .iter()
        .map(|wire| Msg::from_wire(wire, codec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedTransaction {
        msgs,
        memo: tx.memo,
        source: tx.source,
    })
}

/// Document handed to the external signer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignMsg {
    pub chain_id: String,
    pub account_number: i64,
    pub sequence: i64,
    pub memo: String,
    pub msgs: Vec<Msg>,
    pub source: i64,
    pub data: Vec<u8>,
}

impl StdSignMsg {
    /// Canonical bytes to sign (JSON)
    pub fn sign_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Unsigned wire transaction carrying this document's messages.
    /// Signers attach their signature to the returned value.
    pub fn to_std_tx<C: Codec>(&self, codec: &C) -> Result<StdTx, CodecError> {
        Ok(StdTx {
            msgs: self
                .msgs
                .iter()
                .map(|m| m.to_wire(codec))
                .collect::<Result<Vec<_>, _>>()?,
            signatures: Vec::new(),
            memo: self.memo.clone(),
            source: self.source,
            data: self.data.clone(),
        })
    }
}

/// Result row of a transaction search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInfo {
    pub hash: String,
    pub height: i64,
    pub tx: DecodedTransaction,
    pub result: TxResult,
}
