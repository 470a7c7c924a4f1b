use solana_sdk::{pubkey, pubkey::Pubkey};

/**
 * Client Constants
 *
 * This module defines the constant values shared by the address derivations,
 * the transaction builders and the history decoder.
 */

/// ===== PROGRAM IDENTITIES =====

/// Default deployment of the grant distributor program
/// - Overridable through `ClientConfig::program_id`
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("ZnnGciQUP9Qhhsqc7odCvUEXd6np2Cu87wrY6Va1u7p");

/// SPL memo program (v2)
/// - Memo instructions carry raw UTF-8 bytes and no accounts
pub const MEMO_PROGRAM_ID: Pubkey = pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// ===== PDA SEED CONSTANTS =====

/// Seed for grant mint PDA derivation
/// - Used in: [distributor_key, "grant_mint"]
/// - One grant mint per distributor, minted 1:1 on every grant transfer
pub const GRANT_MINT_SEED: &str = "grant_mint";

/// Seed for reward vault PDA derivation
/// - Used in: [distributor_key, "reward_vault", reward_mint]
/// - Escrow of the reward token, owned by the distributor PDA
pub const REWARD_VAULT_SEED: &str = "reward_vault";

/// Seed for grant account PDA derivation
/// - Used in: [distributor_key, "grant", receiver_authority]
/// - One grant token account per (distributor, receiver) pair
pub const GRANT_SEED: &str = "grant";

// The distributor PDA itself has no literal seed: [dist_mint]

/// ===== TRANSACTION CONSTANTS =====

/// Associated token account creations packed into one transaction
/// - Five creations stay under the 1232 byte packet limit with room to spare
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Page size when listing signatures for an address
/// - Matches the RPC node's upper bound for `getSignaturesForAddress`
pub const SIGNATURE_PAGE_LIMIT: usize = 1000;
