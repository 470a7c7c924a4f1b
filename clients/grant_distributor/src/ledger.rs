use crate::error::{classify_send_error, Result};
use async_trait::async_trait;
use serde_json::json;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_config::RpcTransactionConfig, rpc_request::RpcRequest,
};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, hash::Hash,
    instruction::CompiledInstruction, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
    UiTransactionEncoding,
};
use std::str::FromStr;
use std::sync::Arc;

/// One entry of an address's signature history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: Signature,
    pub slot: u64,
    /// The transaction landed but its execution failed
    pub failed: bool,
}

/// A confirmed transaction reduced to what instruction decoding needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalTransaction {
    pub slot: u64,
    /// Static keys followed by keys loaded from lookup tables (writable, then readonly)
    pub account_keys: Vec<Pubkey>,
    pub instructions: Vec<CompiledInstruction>,
}

/**
 * The ledger as seen by the client
 *
 * Every read is independent and may be issued concurrently. Submissions
 * return once the transaction is confirmed; a ledger or program rejection
 * is reported as `SubmissionRejected`.
 */
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.get_account(address).await?.is_some())
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    /// Newest first, at most `limit` entries older than `before`.
    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>>;

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<HistoricalTransaction>>;
}

#[async_trait]
impl<L: LedgerClient + ?Sized> LedgerClient for Arc<L> {
    async fn latest_blockhash(&self) -> Result<Hash> {
        (**self).latest_blockhash().await
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        (**self).get_account(address).await
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        (**self).minimum_balance_for_rent_exemption(data_len).await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        (**self).send_transaction(transaction).await
    }

    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        (**self).signatures_for_address(address, before, limit).await
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<HistoricalTransaction>> {
        (**self).get_transaction(signature).await
    }
}

/// `LedgerClient` over a JSON-RPC node
pub struct RpcLedger {
    rpc: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
        }
    }

}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?
            .value)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(self
            .rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.rpc
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(classify_send_error)
    }

    async fn signatures_for_address(
        &self,
        address: &Pubkey,
        before: Option<Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before,
            until: None,
            limit: Some(limit),
            commitment: Some(self.commitment),
        };
        let statuses = self
            .rpc
            .get_signatures_for_address_with_config(address, config)
            .await?;

        let mut infos = Vec::with_capacity(statuses.len());
        for status in statuses {
            let Ok(signature) = Signature::from_str(&status.signature) else {
                tracing::warn!(signature = %status.signature, "unparsable signature in history");
                continue;
            };
            infos.push(SignatureInfo {
                signature,
                slot: status.slot,
                failed: status.err.is_some(),
            });
        }
        Ok(infos)
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<HistoricalTransaction>> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };
        // The node answers `null` for transactions it no longer keeps
        let confirmed = self
            .rpc
            .send::<Option<EncodedConfirmedTransactionWithStatusMeta>>(
                RpcRequest::GetTransaction,
                json!([signature.to_string(), config]),
            )
            .await?;
        Ok(confirmed.and_then(historical_transaction))
    }
}

/// Reduces an encoded confirmed transaction to its keys and instructions; `None` if it cannot be decoded.
pub(crate) fn historical_transaction(
    confirmed: EncodedConfirmedTransactionWithStatusMeta,
) -> Option<HistoricalTransaction> {
    let transaction = confirmed.transaction.transaction.decode()?;

    let mut account_keys = transaction.message.static_account_keys().to_vec();
    if let Some(meta) = &confirmed.transaction.meta {
        if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
            for key in loaded.writable.iter().chain(loaded.readonly.iter()) {
                if let Ok(key) = Pubkey::from_str(key) {
                    account_keys.push(key);
                }
            }
        }
    }

    Some(HistoricalTransaction {
        slot: confirmed.slot,
        account_keys,
        instructions: transaction.message.instructions().to_vec(),
    })
}
