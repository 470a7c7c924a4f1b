use crate::constants::{MEMO_PROGRAM_ID, SIGNATURE_PAGE_LIMIT};
use crate::error::{DecodeError, GrantClientError, Result};
use crate::event::{GrantTransfer, GrantTransferRecord};
use crate::instructions::{
    decode_memo, DistributorInstruction, InstructionLayout, DONOR_AUTHORITY, RECEIVER_AUTHORITY,
};
use crate::ledger::{HistoricalTransaction, LedgerClient, SignatureInfo};
use crate::program::DistributionProgram;
use futures::future::join_all;
use solana_sdk::{instruction::CompiledInstruction, pubkey::Pubkey};

/**
 * Rebuilds the grant transfer audit trail from ledger history
 *
 * Every `transfer_grant` touches the campaign's grant mint, so the grant
 * mint's signature history contains all of them. Each listed transaction is
 * fetched concurrently and its instructions are matched by program id:
 * - distribution program: decoded against the static schema, only
 *   `transfer_grant` is kept, donor and receiver resolved by account position
 * - memo program: payload read as UTF-8 and attached to the transaction's transfers
 *
 * Transactions without a transfer yield nothing. Transactions that cannot be
 * decoded are logged and skipped; they never abort the scan.
 */
pub struct HistoryDecoder<'a, L: ?Sized> {
    ledger: &'a L,
    program: DistributionProgram,
    page_limit: usize,
}

impl<'a, L: LedgerClient + ?Sized> HistoryDecoder<'a, L> {
    pub fn new(ledger: &'a L, program: DistributionProgram) -> Self {
        Self {
            ledger,
            program,
            page_limit: SIGNATURE_PAGE_LIMIT,
        }
    }

    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// Full signature history of `address`, newest first.
    pub async fn signatures(&self, address: &Pubkey) -> Result<Vec<SignatureInfo>> {
        let mut all = Vec::new();
        let mut before = None;
        loop {
            let page = self
                .ledger
                .signatures_for_address(address, before, self.page_limit)
                .await?;
            let Some(last) = page.last() else {
                break;
            };
            before = Some(last.signature);
            let full = page.len() >= self.page_limit;
            all.extend(page);
            if !full {
                break;
            }
        }
        Ok(all)
    }

    /// Grant transfers of the campaign in chronological order (slot ascending).
    pub async fn get_grants(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<Vec<GrantTransferRecord>> {
        let addresses = self
            .program
            .deriver()
            .distributor_accounts(dist_mint, reward_mint)?;

        let signatures: Vec<SignatureInfo> = self
            .signatures(&addresses.grant_mint)
            .await?
            .into_iter()
            .filter(|info| !info.failed)
            .collect();

        let fetched = join_all(
            signatures
                .iter()
                .map(|info| self.ledger.get_transaction(&info.signature)),
        )
        .await;

        let mut per_transaction = Vec::with_capacity(signatures.len());
        for (info, fetched) in signatures.iter().zip(fetched) {
            let Some(tx) = fetched? else {
                tracing::warn!(signature = %info.signature, "transaction not available, skipped");
                continue;
            };
            match self.decode_transaction(info, &tx) {
                Ok(records) => per_transaction.push(records),
                Err(err) => tracing::warn!(%err, "undecodable transaction"),
            }
        }

        // The listing is newest first
        per_transaction.reverse();
        let mut records: Vec<GrantTransferRecord> = per_transaction.into_iter().flatten().collect();
        records.sort_by_key(|record| record.slot);

        tracing::debug!(
            grant_mint = %addresses.grant_mint,
            signatures = signatures.len(),
            grants = records.len(),
            "decoded grant history"
        );
        Ok(records)
    }

    /// All grant transfers in one transaction; `DecodeSkipped` if any relevant instruction is malformed.
    pub fn decode_transaction(
        &self,
        info: &SignatureInfo,
        tx: &HistoricalTransaction,
    ) -> Result<Vec<GrantTransferRecord>> {
        let skipped = |reason: String| GrantClientError::DecodeSkipped {
            signature: info.signature,
            reason,
        };

        let mut transfers = Vec::new();
        let mut memo = None;

        for ix in &tx.instructions {
            let Some(program_id) = tx.account_keys.get(usize::from(ix.program_id_index)) else {
                return Err(skipped(format!(
                    "program index {} out of range",
                    ix.program_id_index
                )));
            };

            if program_id == self.program.id() {
                let decoded = self
                    .program
                    .schema()
                    .decode(&ix.data)
                    .map_err(|e| skipped(e.to_string()))?;
                if let DistributorInstruction::TransferGrant(args) = &decoded {
                    let layout = decoded.layout();
                    let from = account_for(tx, ix, layout, DONOR_AUTHORITY)
                        .map_err(|e| skipped(e.to_string()))?;
                    let to = account_for(tx, ix, layout, RECEIVER_AUTHORITY)
                        .map_err(|e| skipped(e.to_string()))?;
                    transfers.push(GrantTransfer {
                        from,
                        to,
                        amount: args.amount,
                    });
                }
            } else if *program_id == MEMO_PROGRAM_ID {
                let text = decode_memo(&ix.data)
                    .map_err(DecodeError::from)
                    .map_err(|e| skipped(e.to_string()))?;
                memo = Some(text);
            }
        }

        Ok(transfers
            .into_iter()
            .map(|transfer| GrantTransferRecord {
                transfer,
                memo: memo.clone(),
                signature: info.signature,
                slot: info.slot,
            })
            .collect())
    }
}

fn account_for(
    tx: &HistoricalTransaction,
    ix: &CompiledInstruction,
    layout: &InstructionLayout,
    role: &'static str,
) -> std::result::Result<Pubkey, DecodeError> {
    let missing = |position| DecodeError::MissingAccount { role, position };
    let position = layout.account_index(role).ok_or(missing(usize::MAX))?;
    let index = *ix.accounts.get(position).ok_or(missing(position))?;
    tx.account_keys
        .get(usize::from(index))
        .copied()
        .ok_or(missing(position))
}
