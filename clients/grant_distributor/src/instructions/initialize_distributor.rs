use crate::instructions::schema::INITIALIZE_DISTRIBUTOR;
use crate::state::DerivedBumps;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_spl::token::spl_token;

/**
 * Accounts of `initialize_distributor`
 *
 * Creates the distributor PDA, the grant mint and the reward vault in one go.
 * The program additionally requires `dist_mint` to share `reward_mint`'s
 * decimals and to name `freeze_authority` as its freeze authority.
 *
 * Access Control: payer and freeze authority sign
 */
#[derive(Debug, Clone)]
pub struct InitializeDistributor {
    /// Funds the three new accounts
    pub payer: Pubkey,
    /// Becomes the freeze authority of the grant mint
    pub freeze_authority: Pubkey,
    pub dist_mint: Pubkey,
    pub reward_mint: Pubkey,
    /// Derived from: [dist_mint]
    pub distributor_account: Pubkey,
    /// Derived from: [distributor, "grant_mint"]
    pub grant_mint: Pubkey,
    /// Derived from: [distributor, "reward_vault", reward_mint]
    pub reward_vault: Pubkey,
}

impl ToAccountMetas for InitializeDistributor {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.freeze_authority, true),
            AccountMeta::new_readonly(self.dist_mint, false),
            AccountMeta::new_readonly(self.reward_mint, false),
            AccountMeta::new(self.distributor_account, false),
            AccountMeta::new(self.grant_mint, false),
            AccountMeta::new(self.reward_vault, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitializeDistributorArgs {
    pub dist_end_ts: i64,
    pub redeem_start_ts: i64,
    pub bumps: DerivedBumps,
}

pub fn initialize_distributor(
    program_id: &Pubkey,
    accounts: &InitializeDistributor,
    args: &InitializeDistributorArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: INITIALIZE_DISTRIBUTOR.encode(args),
    }
}
