/*!
 * Grant Distributor Client
 *
 * Client side of a grant distribution campaign run by the grant distributor
 * program. Distributors hold a distribution token; spending it assigns grant
 * tokens to receivers, who later redeem them for the reward token.
 *
 * Architecture:
 * - Distributor PDA: [dist_mint], one per campaign
 * - Grant Mint PDA: [distributor, "grant_mint"], minted on every grant transfer
 * - Reward Vault PDA: [distributor, "reward_vault", reward_mint], escrow of the reward
 * - Grant PDAs: [distributor, "grant", receiver], one grant token account per receiver
 *
 * Workflow:
 * 1. Operator prepares the distribution mint and mints each distributor's budget
 * 2. Operator creates the distributor with its distribution end and redemption start
 * 3. Operator funds the reward vault
 * 4. Distributors assign grants, optionally with a memo, until the distribution ends
 * 5. Receivers redeem their grants once redemption has started
 * 6. The freeze authority can freeze individual grants at any time
 *
 * The grant history is rebuilt from the grant mint's transactions by `HistoryDecoder`.
 */

pub mod batch;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod history;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod program;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test;

pub use batch::InstructionBatcher;
pub use client::{BudgetAllocation, DistributionAssetSetup, GrantClient, GrantSigner, RedemptionPolicy, SharedSigner};
pub use config::ClientConfig;
pub use error::{DecodeError, GrantClientError, Result};
pub use event::{GrantTransfer, GrantTransferRecord};
pub use history::HistoryDecoder;
pub use ledger::{HistoricalTransaction, LedgerClient, RpcLedger, SignatureInfo};
pub use pda::{AddressDeriver, DistributorAddresses};
pub use program::DistributionProgram;
pub use state::{DerivedBumps, DistributorAccount};
