// Fee schedule returned by `param/fees`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeDistributeType {
    ForProposer,
    ForAll,
    Free,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexFeeField {
    pub fee_name: String,
    pub fee_value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeParam {
    Fixed {
        msg_type: String,
        fee: i64,
        fee_for: FeeDistributeType,
    },
    Transfer {
        fee: i64,
        fee_for: FeeDistributeType,
        multi_transfer_fee: i64,
        lower_limit_as_multi: i64,
    },
    Dex {
        dex_fee_fields: Vec<DexFeeField>,
    },
}

impl FeeParam {
    /// Message type a fixed fee applies to
    pub fn msg_type(&self) -> Option<&str> {
        match self {
            FeeParam::Fixed { msg_type, .. } => Some(msg_type),
            FeeParam::Transfer { .. } => Some("send"),
            FeeParam::Dex { .. } => None,
        }
    }
}
