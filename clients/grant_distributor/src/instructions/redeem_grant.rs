use crate::instructions::schema::REDEEM_GRANT;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::sysvar;
use anchor_spl::token::spl_token;

/**
 * Accounts of `redeem_grant`
 *
 * Burns the receiver's whole grant balance and pays out reward tokens from
 * the reward vault. The payout rule is the program's, not the client's.
 *
 * Access Control: receiver authority signs; rejected before `redeem_start_ts`
 * and for frozen grant accounts
 */
#[derive(Debug, Clone)]
pub struct RedeemGrant {
    pub payer: Pubkey,
    pub receiver_authority: Pubkey,
    pub distributor_account: Pubkey,
    pub grant_mint: Pubkey,
    pub grant_account: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_vault: Pubkey,
    /// Receiver's associated token account of `reward_mint`
    pub receiver_token_account: Pubkey,
}

impl ToAccountMetas for RedeemGrant {
    fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.payer, true),
            AccountMeta::new_readonly(self.receiver_authority, true),
            AccountMeta::new_readonly(self.distributor_account, false),
            AccountMeta::new(self.grant_mint, false),
            AccountMeta::new(self.grant_account, false),
            AccountMeta::new_readonly(self.reward_mint, false),
            AccountMeta::new(self.reward_vault, false),
            AccountMeta::new(self.receiver_token_account, false),
            AccountMeta::new_readonly(sysvar::clock::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct RedeemGrantArgs {
    pub bump: u8,
}

pub fn redeem_grant(
    program_id: &Pubkey,
    accounts: &RedeemGrant,
    args: &RedeemGrantArgs,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: REDEEM_GRANT.encode(args),
    }
}
