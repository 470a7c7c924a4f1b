use crate::error::Result;
use crate::instructions::{InstructionSchema, SCHEMA_V1};
use crate::pda::AddressDeriver;
use solana_sdk::pubkey::Pubkey;

/// Handle on one deployment of the grant distributor program
#[derive(Debug, Clone, Copy)]
pub struct DistributionProgram {
    program_id: Pubkey,
    schema: &'static InstructionSchema,
}

impl DistributionProgram {
    /// Validates the instruction schema; every later encode and decode relies on it.
    pub fn new(program_id: Pubkey) -> Result<Self> {
        SCHEMA_V1.validate()?;
        Ok(Self {
            program_id,
            schema: &SCHEMA_V1,
        })
    }

    pub fn id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn schema(&self) -> &'static InstructionSchema {
        self.schema
    }

    pub fn deriver(&self) -> AddressDeriver {
        AddressDeriver::new(self.program_id)
    }
}
