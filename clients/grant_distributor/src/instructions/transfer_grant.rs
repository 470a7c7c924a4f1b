use crate::instructions::schema::TRANSFER_GRANT;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_spl::token::spl_token;

/**
 * Accounts of `transfer_grant`
 *
 * Burns `amount` distribution tokens from the donor's token account and mints
 * the same amount of grant tokens into the receiver's grant account.
 *
 * Access Control: donor authority signs
 */
#[derive(Debug, Clone)]
pub struct TransferGrant {
    pub payer: Pubkey,
    pub donor_authority: Pubkey,
    pub receiver_authority: Pubkey,
    pub distributor_account: Pubkey,
    pub dist_mint: Pubkey,
    /// Donor's associated token account of `dist_mint`
    pub dist_token: Pubkey,
    pub grant_mint: Pubkey,
    pub grant_account: Pubkey,
}

impl ToAccountMetas for TransferGrant {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.payer, true),
            AccountMeta::new_readonly(self.donor_authority, true),
            AccountMeta::new_readonly(self.receiver_authority, false),
            AccountMeta::new_readonly(self.distributor_account, false),
            AccountMeta::new(self.dist_mint, false),
            AccountMeta::new(self.dist_token, false),
            AccountMeta::new(self.grant_mint, false),
            AccountMeta::new(self.grant_account, false),
            AccountMeta::new_readonly(sysvar::clock::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferGrantArgs {
    pub amount: u64,
    pub bump: u8,
}

pub fn transfer_grant(
    program_id: &Pubkey,
    accounts: &TransferGrant,
    args: &TransferGrantArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: TRANSFER_GRANT.encode(args),
    }
}
