use anchor_lang::prelude::*;

/**
 * Distributor state account, as stored by the program
 *
 * One per campaign. Read-only from the client's point of view: the program
 * writes it once in `initialize_distributor` and never updates it.
 *
 * Derivation: [dist_mint]
 *
 * Layout: 8-byte account discriminator followed by the borsh encoding of
 * the fields below.
 */
#[derive(AnchorSerialize, AnchorDeserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct DistributorAccount {
    /// Mint whose holdings gate grant transfers
    pub dist_mint: Pubkey,

    /// Unix timestamp after which grants can no longer be transferred
    pub dist_end_ts: i64,

    /// Unix timestamp from which grants can be redeemed
    /// - The program rejects creation unless this is after `dist_end_ts`
    pub redeem_start_ts: i64,

    /// Canonical bumps of the three distributor PDAs
    pub bumps: DerivedBumps,
}

/// Bumps handed to `initialize_distributor` so the program can re-sign without a search
#[derive(AnchorSerialize, AnchorDeserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedBumps {
    pub distributor_bump: u8,
    pub grant_bump: u8,
    pub reward_bump: u8,
}

impl DistributorAccount {
    /// sha256("account:DistributorAccount")[..8]
    pub const DISCRIMINATOR: [u8; 8] = [38, 14, 200, 38, 27, 205, 123, 134];

    /// Includes 8-byte discriminator + 32 + 8 + 8 + 3
    pub const LEN: usize = 8 + 32 + 8 + 8 + 3;

    /// Decodes raw account data; `None` if the discriminator or layout does not match.
    pub fn try_from_account_data(data: &[u8]) -> Option<Self> {
        let (discriminator, mut rest) = data.split_at_checked(8)?;
        if discriminator != Self::DISCRIMINATOR {
            return None;
        }
        Self::deserialize(&mut rest).ok()
    }

    pub fn to_account_data(&self) -> Vec<u8> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        // Writing into a Vec cannot fail
        let _ = self.serialize(&mut data);
        data
    }

    /// Transfers are accepted while `now <= dist_end_ts`.
    pub fn is_distribution_open(&self, now: i64) -> bool {
        now <= self.dist_end_ts
    }

    /// Redemptions are accepted once `now >= redeem_start_ts`.
    pub fn is_redeemable(&self, now: i64) -> bool {
        now >= self.redeem_start_ts
    }
}
