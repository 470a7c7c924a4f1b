#[cfg(test)]
mod tests {
    use crate::constants::{DEFAULT_PROGRAM_ID, MEMO_PROGRAM_ID};
    use crate::error::GrantClientError;
    use crate::event::GrantTransferRecord;
    use crate::history::HistoryDecoder;
    use crate::instructions::*;
    use crate::ledger::{HistoricalTransaction, SignatureInfo};
    use crate::program::DistributionProgram;
    use crate::test::fake_ledger::FakeLedger;
    use solana_sdk::{
        instruction::{CompiledInstruction, Instruction},
        message::Message,
        pubkey::Pubkey,
        signature::Signature,
    };
    use std::collections::HashSet;

    struct Parties {
        donor: Pubkey,
        receiver: Pubkey,
    }

    fn transfer(parties: &Parties, amount: u64) -> Instruction {
        let accounts = TransferGrant {
            payer: Pubkey::new_unique(),
            donor_authority: parties.donor,
            receiver_authority: parties.receiver,
            distributor_account: Pubkey::new_unique(),
            dist_mint: Pubkey::new_unique(),
            dist_token: Pubkey::new_unique(),
            grant_mint: Pubkey::new_unique(),
            grant_account: Pubkey::new_unique(),
        };
        transfer_grant(&DEFAULT_PROGRAM_ID, &accounts, &TransferGrantArgs { amount, bump: 255 })
    }

    fn compile(instructions: &[Instruction]) -> HistoricalTransaction {
        let payer = Pubkey::new_unique();
        let message = Message::new(instructions, Some(&payer));
        HistoricalTransaction {
            slot: 7,
            account_keys: message.account_keys,
            instructions: message.instructions,
        }
    }

    fn info() -> SignatureInfo {
        SignatureInfo {
            signature: Signature::new_unique(),
            slot: 7,
            failed: false,
        }
    }

    fn program() -> DistributionProgram {
        DistributionProgram::new(DEFAULT_PROGRAM_ID).unwrap()
    }

    fn parties() -> Parties {
        Parties {
            donor: Pubkey::new_unique(),
            receiver: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_decode_transfer_with_memo() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let decoder = HistoryDecoder::new(&ledger, program());
        let parties = parties();
        let info = info();

        let tx = compile(&[transfer(&parties, 50), memo("thanks for the review")]);
        let records = decoder.decode_transaction(&info, &tx).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.transfer.from, parties.donor);
        assert_eq!(record.transfer.to, parties.receiver);
        assert_eq!(record.transfer.amount, 50);
        assert_eq!(record.memo.as_deref(), Some("thanks for the review"));
        assert_eq!(record.signature, info.signature);
        assert_eq!(record.slot, 7);
    }

    #[test]
    fn test_one_record_per_transfer() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let decoder = HistoryDecoder::new(&ledger, program());
        let (first, second) = (parties(), parties());

        let tx = compile(&[transfer(&first, 10), transfer(&second, 20)]);
        let records = decoder.decode_transaction(&info(), &tx).unwrap();

        let amounts: Vec<u64> = records.iter().map(|r| r.transfer.amount).collect();
        assert_eq!(amounts, vec![10, 20]);
        assert_eq!(records[1].transfer.to, second.receiver);
        assert!(records.iter().all(|r| r.memo.is_none()));
    }

    #[test]
    fn test_transaction_without_transfer_yields_nothing() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let decoder = HistoryDecoder::new(&ledger, program());
        let tx = compile(&[memo("no grant here")]);
        assert!(decoder.decode_transaction(&info(), &tx).unwrap().is_empty());
    }

    #[test]
    fn test_undecodable_transactions_are_reported() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let decoder = HistoryDecoder::new(&ledger, program());

        // Unknown discriminator
        let garbage = Instruction {
            program_id: DEFAULT_PROGRAM_ID,
            accounts: vec![],
            data: vec![9; 12],
        };
        let result = decoder.decode_transaction(&info(), &compile(&[garbage]));
        assert!(matches!(result, Err(GrantClientError::DecodeSkipped { .. })));

        // Memo that is not UTF-8
        let bad_memo = Instruction {
            program_id: MEMO_PROGRAM_ID,
            accounts: vec![],
            data: vec![0xf0, 0x28, 0x8c, 0x28],
        };
        let result = decoder.decode_transaction(&info(), &compile(&[transfer(&parties(), 1), bad_memo]));
        assert!(matches!(result, Err(GrantClientError::DecodeSkipped { .. })));

        // Transfer with its account list cut short
        let mut tx = compile(&[transfer(&parties(), 1)]);
        tx.instructions[0].accounts.truncate(2);
        let result = decoder.decode_transaction(&info(), &tx);
        assert!(matches!(result, Err(GrantClientError::DecodeSkipped { .. })));

        // Program index pointing past the key list
        let tx = HistoricalTransaction {
            slot: 1,
            account_keys: vec![Pubkey::new_unique()],
            instructions: vec![CompiledInstruction::new_from_raw_parts(5, vec![], vec![])],
        };
        let result = decoder.decode_transaction(&info(), &tx);
        assert!(matches!(result, Err(GrantClientError::DecodeSkipped { .. })));
    }

    #[test]
    fn test_other_programs_are_ignored() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let decoder = HistoryDecoder::new(&ledger, program());
        let foreign = Instruction {
            program_id: Pubkey::new_unique(),
            accounts: vec![],
            data: vec![0xff; 3],
        };
        let tx = compile(&[foreign, transfer(&parties(), 3)]);
        assert_eq!(decoder.decode_transaction(&info(), &tx).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signature_paging_collects_everything() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let address = Pubkey::new_unique();
        let pushed: Vec<Signature> = (0..7)
            .map(|_| ledger.push_raw(&address, compile(&[memo("filler")])))
            .collect();

        let decoder = HistoryDecoder::new(&ledger, program()).with_page_limit(3);
        let listed: Vec<Signature> = decoder
            .signatures(&address)
            .await
            .unwrap()
            .into_iter()
            .map(|info| info.signature)
            .collect();

        let newest_first: Vec<Signature> = pushed.into_iter().rev().collect();
        assert_eq!(listed, newest_first, "Pages should chain without gaps or repeats");
    }

    /// Three single-transfer transactions (amounts 1, 2, 3) on a campaign's grant mint.
    fn seeded_history(ledger: &FakeLedger) -> (Pubkey, Pubkey, Vec<Signature>) {
        let (dist_mint, reward_mint) = (Pubkey::new_unique(), Pubkey::new_unique());
        let addresses = program()
            .deriver()
            .distributor_accounts(&dist_mint, &reward_mint)
            .unwrap();
        let signatures = (1..=3)
            .map(|amount| ledger.push_raw(&addresses.grant_mint, compile(&[transfer(&parties(), amount)])))
            .collect();
        (dist_mint, reward_mint, signatures)
    }

    fn amounts(records: &[GrantTransferRecord]) -> Vec<u64> {
        records.iter().map(|r| r.transfer.amount).collect()
    }

    #[tokio::test]
    async fn test_failed_transactions_are_not_fetched() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let (dist_mint, reward_mint, signatures) = seeded_history(&ledger);
        ledger.mark_failed(&signatures[1]);

        let records = HistoryDecoder::new(&ledger, program())
            .get_grants(&dist_mint, &reward_mint)
            .await
            .unwrap();
        assert_eq!(amounts(&records), vec![1, 3]);
        assert!(
            !ledger.fetched().contains(&signatures[1]),
            "A failed listing entry must not be fetched"
        );
    }

    #[tokio::test]
    async fn test_missing_transactions_are_skipped() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let (dist_mint, reward_mint, signatures) = seeded_history(&ledger);
        ledger.prune(&signatures[0]);

        let records = HistoryDecoder::new(&ledger, program())
            .get_grants(&dist_mint, &reward_mint)
            .await
            .unwrap();
        assert_eq!(amounts(&records), vec![2, 3]);
        assert!(ledger.fetched().contains(&signatures[0]));
    }

    #[tokio::test]
    async fn test_fetch_error_surfaces_after_all_fetches() {
        let ledger = FakeLedger::new(DEFAULT_PROGRAM_ID);
        let (dist_mint, reward_mint, signatures) = seeded_history(&ledger);
        // Newest first, so this is the first fetch issued
        ledger.break_fetch(&signatures[2]);

        let result = HistoryDecoder::new(&ledger, program())
            .get_grants(&dist_mint, &reward_mint)
            .await;
        assert!(matches!(result, Err(GrantClientError::Io(_))));

        let fetched: HashSet<Signature> = ledger.fetched().into_iter().collect();
        let expected: HashSet<Signature> = signatures.into_iter().collect();
        assert_eq!(fetched, expected, "Every fetch runs before the error is returned");
    }
}
