use crate::error::{GrantClientError, Result};
use anchor_lang::solana_program::program_pack::Pack;
use anchor_spl::associated_token::{get_associated_token_address, spl_associated_token_account};
use anchor_spl::token::spl_token::{
    self,
    state::{Account as TokenAccount, Mint},
};
use solana_sdk::{account::Account, instruction::Instruction, pubkey::Pubkey, system_instruction};

/// Associated token account of `owner` for `mint` under the classic token program
pub fn associated_token_address(mint: &Pubkey, owner: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Creates `owner`'s associated token account for `mint`, paid by `payer`
pub fn create_associated_token_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        payer,
        owner,
        mint,
        &spl_token::ID,
    )
}

/// Allocates and initializes a mint whose mint and freeze authority is `authority`
pub fn create_mint(
    payer: &Pubkey,
    mint: &Pubkey,
    authority: &Pubkey,
    decimals: u8,
    rent_lamports: u64,
) -> Result<Vec<Instruction>> {
    Ok(vec![
        system_instruction::create_account(
            payer,
            mint,
            rent_lamports,
            Mint::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_mint2(
            &spl_token::ID,
            mint,
            authority,
            Some(authority),
            decimals,
        )?,
    ])
}

pub fn mint_to(mint: &Pubkey, destination: &Pubkey, authority: &Pubkey, amount: u64) -> Result<Instruction> {
    Ok(spl_token::instruction::mint_to(
        &spl_token::ID,
        mint,
        destination,
        authority,
        &[],
        amount,
    )?)
}

pub fn transfer(source: &Pubkey, destination: &Pubkey, authority: &Pubkey, amount: u64) -> Result<Instruction> {
    Ok(spl_token::instruction::transfer(
        &spl_token::ID,
        source,
        destination,
        authority,
        &[],
        amount,
    )?)
}

pub fn freeze_account(account: &Pubkey, mint: &Pubkey, freeze_authority: &Pubkey) -> Result<Instruction> {
    Ok(spl_token::instruction::freeze_account(
        &spl_token::ID,
        account,
        mint,
        freeze_authority,
        &[],
    )?)
}

pub fn unpack_mint(address: &Pubkey, account: &Account) -> Result<Mint> {
    if account.owner != spl_token::ID {
        return Err(GrantClientError::InvalidAccountData(*address));
    }
    Mint::unpack(&account.data).map_err(|_| GrantClientError::InvalidAccountData(*address))
}

pub fn unpack_token_account(address: &Pubkey, account: &Account) -> Result<TokenAccount> {
    if account.owner != spl_token::ID {
        return Err(GrantClientError::InvalidAccountData(*address));
    }
    TokenAccount::unpack(&account.data).map_err(|_| GrantClientError::InvalidAccountData(*address))
}

/// Converts whole tokens into base units: `amount * 10^decimals`
pub fn scale_amount(amount: u64, decimals: u8) -> Result<u64> {
    10u64
        .checked_pow(decimals.into())
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or(GrantClientError::AmountOverflow)
}
