use crate::constants::*;
use crate::error::{GrantClientError, Result};
use crate::state::DerivedBumps;
use solana_sdk::pubkey::Pubkey;

/**
 * Program derived addresses of one distribution campaign
 *
 * Derivations:
 * - distributor:  [dist_mint]
 * - grant mint:   [distributor, "grant_mint"]
 * - reward vault: [distributor, "reward_vault", reward_mint]
 * - grant:        [distributor, "grant", receiver_authority]
 *
 * Every derivation is a pure function of its seeds and the program id.
 */
#[derive(Debug, Clone, Copy)]
pub struct AddressDeriver {
    program_id: Pubkey,
}

/// The three addresses fixed at distributor creation and their canonical bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributorAddresses {
    pub distributor: Pubkey,
    pub grant_mint: Pubkey,
    pub reward_vault: Pubkey,
    pub bumps: DerivedBumps,
}

impl AddressDeriver {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Searches bumps 255 down to 1 for the first off-curve address.
    pub fn derive(&self, seeds: &[&[u8]]) -> Result<(Pubkey, u8)> {
        Pubkey::try_find_program_address(seeds, &self.program_id)
            .ok_or(GrantClientError::DerivationExhausted)
    }

    pub fn distributor(&self, dist_mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.derive(&[dist_mint.as_ref()])
    }

    pub fn grant_mint(&self, distributor: &Pubkey) -> Result<(Pubkey, u8)> {
        self.derive(&[distributor.as_ref(), GRANT_MINT_SEED.as_bytes()])
    }

    pub fn reward_vault(&self, distributor: &Pubkey, reward_mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.derive(&[
            distributor.as_ref(),
            REWARD_VAULT_SEED.as_bytes(),
            reward_mint.as_ref(),
        ])
    }

    pub fn grant_account(&self, distributor: &Pubkey, receiver: &Pubkey) -> Result<(Pubkey, u8)> {
        self.derive(&[distributor.as_ref(), GRANT_SEED.as_bytes(), receiver.as_ref()])
    }

    pub fn distributor_accounts(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<DistributorAddresses> {
        let (distributor, distributor_bump) = self.distributor(dist_mint)?;
        let (grant_mint, grant_bump) = self.grant_mint(&distributor)?;
        let (reward_vault, reward_bump) = self.reward_vault(&distributor, reward_mint)?;

        tracing::debug!(
            program_id = %self.program_id,
            %distributor,
            %grant_mint,
            %reward_vault,
            "derived distributor accounts"
        );

        Ok(DistributorAddresses {
            distributor,
            grant_mint,
            reward_vault,
            bumps: DerivedBumps {
                distributor_bump,
                grant_bump,
                reward_bump,
            },
        })
    }
}
