use crate::error::{DecodeError, GrantClientError};
use crate::instructions::{
    InitializeDistributorArgs, InitializeGrantArgs, RedeemGrantArgs, TransferGrantArgs,
};
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use anchor_lang::solana_program::hash::hash;
use std::collections::HashSet;

/**
 * Static instruction schema of the grant distributor program
 *
 * For every instruction: its name, the 8-byte anchor discriminator
 * (sha256("global:<name>")[..8]), the account roles in the order the program
 * expects them, and the payload fields in encoding order.
 *
 * The builders in this module emit accounts in exactly this order and the
 * history decoder resolves roles by position against it, so the two can
 * never drift apart without `InstructionSchema::validate` or the tests noticing.
 */
#[derive(Debug)]
pub struct InstructionLayout {
    pub name: &'static str,
    pub discriminator: [u8; 8],
    pub accounts: &'static [&'static str],
    pub args: &'static [&'static str],
}

impl InstructionLayout {
    pub fn encode<T: AnchorSerialize>(&self, args: &T) -> Vec<u8> {
        let mut data = self.discriminator.to_vec();
        // Writing into a Vec cannot fail
        let _ = args.serialize(&mut data);
        data
    }

    pub fn account_index(&self, role: &str) -> Option<usize> {
        self.accounts.iter().position(|r| *r == role)
    }

    fn decode_args<T: AnchorDeserialize>(&self, mut payload: &[u8]) -> Result<T, DecodeError> {
        T::deserialize(&mut payload).map_err(|source| DecodeError::InvalidPayload {
            name: self.name,
            source,
        })
    }
}

pub const INITIALIZE_DISTRIBUTOR: InstructionLayout = InstructionLayout {
    name: "initialize_distributor",
    discriminator: [189, 128, 103, 10, 73, 227, 37, 18],
    accounts: &[
        "payer",
        "freeze_authority",
        "dist_mint",
        "reward_mint",
        "distributor_account",
        "grant_mint",
        "reward_vault",
        "rent",
        "system_program",
        "token_program",
    ],
    args: &["dist_end_ts", "redeem_start_ts", "bumps"],
};

pub const INITIALIZE_GRANT: InstructionLayout = InstructionLayout {
    name: "initialize_grant",
    discriminator: [184, 107, 195, 195, 183, 76, 186, 197],
    accounts: &[
        "payer",
        "donor_authority",
        "receiver_authority",
        "distributor_account",
        "grant_mint",
        "grant_account",
        "clock",
        "rent",
        "system_program",
        "token_program",
    ],
    args: &["bump"],
};

pub const TRANSFER_GRANT: InstructionLayout = InstructionLayout {
    name: "transfer_grant",
    discriminator: [106, 201, 72, 189, 79, 228, 160, 107],
    accounts: &[
        "payer",
        "donor_authority",
        "receiver_authority",
        "distributor_account",
        "dist_mint",
        "dist_token",
        "grant_mint",
        "grant_account",
        "clock",
        "rent",
        "system_program",
        "token_program",
    ],
    args: &["amount", "bump"],
};

pub const REDEEM_GRANT: InstructionLayout = InstructionLayout {
    name: "redeem_grant",
    discriminator: [58, 192, 97, 1, 79, 35, 251, 226],
    accounts: &[
        "payer",
        "receiver_authority",
        "distributor_account",
        "grant_mint",
        "grant_account",
        "reward_mint",
        "reward_vault",
        "receiver_token_account",
        "clock",
        "token_program",
    ],
    args: &["bump"],
};

/// Roles the history decoder reads out of `transfer_grant`
pub const DONOR_AUTHORITY: &str = "donor_authority";
pub const RECEIVER_AUTHORITY: &str = "receiver_authority";

#[derive(Debug)]
pub struct InstructionSchema {
    pub version: u8,
    pub instructions: &'static [InstructionLayout],
}

pub const SCHEMA_V1: InstructionSchema = InstructionSchema {
    version: 1,
    instructions: &[
        INITIALIZE_DISTRIBUTOR,
        INITIALIZE_GRANT,
        TRANSFER_GRANT,
        REDEEM_GRANT,
    ],
};

impl InstructionSchema {
    /// Checks the schema's internal consistency. Run once when a program handle is built.
    pub fn validate(&self) -> Result<(), GrantClientError> {
        let invalid = |msg: String| Err(GrantClientError::InvalidSchema(msg));

        let mut discriminators = HashSet::new();
        for layout in self.instructions {
            let expected = hash(format!("global:{}", layout.name).as_bytes()).to_bytes();
            if layout.discriminator[..] != expected[..8] {
                return invalid(format!("{}: discriminator mismatch", layout.name));
            }
            if !discriminators.insert(layout.discriminator) {
                return invalid(format!("{}: duplicate discriminator", layout.name));
            }
            if layout.accounts.is_empty() {
                return invalid(format!("{}: no accounts", layout.name));
            }
            let roles: HashSet<_> = layout.accounts.iter().collect();
            if roles.len() != layout.accounts.len() {
                return invalid(format!("{}: duplicate account role", layout.name));
            }
        }

        let transfer = self
            .instructions
            .iter()
            .find(|layout| layout.name == TRANSFER_GRANT.name);
        match transfer {
            Some(layout)
                if layout.account_index(DONOR_AUTHORITY).is_some()
                    && layout.account_index(RECEIVER_AUTHORITY).is_some() => {}
            _ => return invalid(format!("v{}: transfer_grant roles missing", self.version)),
        }

        Ok(())
    }

    pub fn find(&self, data: &[u8]) -> Option<&'static InstructionLayout> {
        let discriminator = data.get(..8)?;
        self.instructions
            .iter()
            .find(|layout| layout.discriminator[..] == *discriminator)
    }

    /// Decodes one instruction of this schema; discriminators it does not list are unknown.
    pub fn decode(&self, data: &[u8]) -> Result<DistributorInstruction, DecodeError> {
        let Some((discriminator, payload)) = data.split_first_chunk::<8>() else {
            return Err(DecodeError::TooShort(data.len()));
        };
        let unknown = DecodeError::UnknownDiscriminator(*discriminator);
        let layout = self.find(data).ok_or(unknown)?;

        match layout.name {
            name if name == INITIALIZE_DISTRIBUTOR.name => layout
                .decode_args(payload)
                .map(DistributorInstruction::InitializeDistributor),
            name if name == INITIALIZE_GRANT.name => layout
                .decode_args(payload)
                .map(DistributorInstruction::InitializeGrant),
            name if name == TRANSFER_GRANT.name => layout
                .decode_args(payload)
                .map(DistributorInstruction::TransferGrant),
            name if name == REDEEM_GRANT.name => layout
                .decode_args(payload)
                .map(DistributorInstruction::RedeemGrant),
            _ => Err(DecodeError::UnknownDiscriminator(*discriminator)),
        }
    }
}

/// A decoded instruction of the grant distributor program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributorInstruction {
    InitializeDistributor(InitializeDistributorArgs),
    InitializeGrant(InitializeGrantArgs),
    TransferGrant(TransferGrantArgs),
    RedeemGrant(RedeemGrantArgs),
}

impl DistributorInstruction {
    /// Decodes against the current schema.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        SCHEMA_V1.decode(data)
    }

    pub fn layout(&self) -> &'static InstructionLayout {
        match self {
            Self::InitializeDistributor(_) => &INITIALIZE_DISTRIBUTOR,
            Self::InitializeGrant(_) => &INITIALIZE_GRANT,
            Self::TransferGrant(_) => &TRANSFER_GRANT,
            Self::RedeemGrant(_) => &REDEEM_GRANT,
        }
    }
}
