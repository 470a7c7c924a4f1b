use crate::batch::InstructionBatcher;
use crate::client::{GrantClient, SharedSigner};
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_PROGRAM_ID, SIGNATURE_PAGE_LIMIT};
use crate::error::Result;
use crate::ledger::RpcLedger;
use crate::program::DistributionProgram;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};
use std::path::Path;

/// Connection and program settings, loadable from JSON. Missing fields take their defaults.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub commitment: CommitmentLevel,
    #[serde_as(as = "DisplayFromStr")]
    pub program_id: Pubkey,
    /// Instruction groups per batched transaction
    pub batch_size: usize,
    /// Signatures requested per history page
    pub signature_page_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8899".to_owned(),
            commitment: CommitmentLevel::Confirmed,
            program_id: DEFAULT_PROGRAM_ID,
            batch_size: DEFAULT_BATCH_SIZE,
            signature_page_limit: SIGNATURE_PAGE_LIMIT,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }

    pub fn batcher(&self) -> Result<InstructionBatcher> {
        InstructionBatcher::new(self.batch_size)
    }

    /// Builds an RPC-backed client acting as `operator`.
    pub fn connect(&self, operator: SharedSigner) -> Result<GrantClient<RpcLedger>> {
        let ledger = RpcLedger::new(self.rpc_url.clone(), self.commitment_config());
        let program = DistributionProgram::new(self.program_id)?;
        Ok(GrantClient::new(ledger, program, operator)
            .with_batcher(self.batcher()?)
            .with_page_limit(self.signature_page_limit))
    }
}
