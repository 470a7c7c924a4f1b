use crate::constants::DEFAULT_BATCH_SIZE;
use crate::error::{GrantClientError, Result};
use solana_sdk::{hash::Hash, instruction::Instruction, pubkey::Pubkey, transaction::Transaction};

/**
 * Packs independent instruction groups into transactions
 *
 * Each group (e.g. the instructions creating one associated token account)
 * stays whole inside one transaction. Empty groups are dropped, the rest are
 * chunked `max_per_batch` at a time in input order.
 *
 * The returned transactions are unsigned and share the fee payer and blockhash.
 */
#[derive(Debug, Clone, Copy)]
pub struct InstructionBatcher {
    max_per_batch: usize,
}

impl Default for InstructionBatcher {
    fn default() -> Self {
        Self {
            max_per_batch: DEFAULT_BATCH_SIZE,
        }
    }
}

impl InstructionBatcher {
    pub fn new(max_per_batch: usize) -> Result<Self> {
        if max_per_batch == 0 {
            return Err(GrantClientError::InvalidBatchSize);
        }
        Ok(Self { max_per_batch })
    }

    pub fn max_per_batch(&self) -> usize {
        self.max_per_batch
    }

    /// Groups in, chunks out: the concatenation of the chunks equals the non-empty input groups.
    pub fn chunk(&self, groups: Vec<Vec<Instruction>>) -> Vec<Vec<Instruction>> {
        let groups: Vec<_> = groups.into_iter().filter(|g| !g.is_empty()).collect();
        groups
            .chunks(self.max_per_batch)
            .map(|chunk| chunk.iter().flatten().cloned().collect())
            .collect()
    }

    pub fn batch(
        &self,
        groups: Vec<Vec<Instruction>>,
        fee_payer: &Pubkey,
        recent_blockhash: Hash,
    ) -> Vec<Transaction> {
        self.chunk(groups)
            .into_iter()
            .map(|instructions| {
                let mut tx = Transaction::new_with_payer(&instructions, Some(fee_payer));
                tx.message.recent_blockhash = recent_blockhash;
                tx
            })
            .collect()
    }
}
