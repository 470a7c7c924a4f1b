use crate::instructions::schema::INITIALIZE_GRANT;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_spl::token::spl_token;

/**
 * Accounts of `initialize_grant`
 *
 * Creates the receiver's grant token account. Only valid while the
 * distribution period is open, and only once per receiver.
 */
#[derive(Debug, Clone)]
pub struct InitializeGrant {
    pub payer: Pubkey,
    pub donor_authority: Pubkey,
    pub receiver_authority: Pubkey,
    pub distributor_account: Pubkey,
    pub grant_mint: Pubkey,
    /// Derived from: [distributor, "grant", receiver_authority]
    pub grant_account: Pubkey,
}

impl ToAccountMetas for InitializeGrant {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.payer, true),
            AccountMeta::new_readonly(self.donor_authority, true),
            AccountMeta::new_readonly(self.receiver_authority, false),
            AccountMeta::new_readonly(self.distributor_account, false),
            AccountMeta::new_readonly(self.grant_mint, false),
            AccountMeta::new(self.grant_account, false),
            AccountMeta::new_readonly(sysvar::clock::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct InitializeGrantArgs {
    pub bump: u8,
}

pub fn initialize_grant(
    program_id: &Pubkey,
    accounts: &InitializeGrant,
    args: &InitializeGrantArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: INITIALIZE_GRANT.encode(args),
    }
}
