use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// A grant transfer as recorded by a `transfer_grant` instruction
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTransfer {
    /// Donor authority whose distribution tokens were burned
    #[serde_as(as = "DisplayFromStr")]
    pub from: Pubkey,
    /// Receiver authority credited with grant tokens
    #[serde_as(as = "DisplayFromStr")]
    pub to: Pubkey,
    /// Base units of the distribution mint
    pub amount: u64,
}

/// A grant transfer reconstructed from ledger history, with the memo sent alongside it
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTransferRecord {
    pub transfer: GrantTransfer,
    pub memo: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub signature: Signature,
    pub slot: u64,
}
