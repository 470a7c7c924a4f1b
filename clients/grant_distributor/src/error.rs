use anchor_lang::solana_program::program_error::ProgramError;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_request::{RpcError, RpcResponseErrorData},
    rpc_response::RpcSimulateTransactionResult,
};
use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::SignerError};
use std::fmt::Write;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrantClientError>;

#[derive(Debug, Error)]
pub enum GrantClientError {
    // Address derivation
    #[error("no off-curve address found for the given seeds")]
    DerivationExhausted,

    // Account lookups
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),
    #[error("account {0} does not hold the expected data")]
    InvalidAccountData(Pubkey),

    // Submission
    #[error("transaction rejected: {0}")]
    SubmissionRejected(String),

    // History decoding
    #[error("skipped transaction {signature}: {reason}")]
    DecodeSkipped { signature: Signature, reason: String },

    // Configuration
    #[error("batch size must be at least one instruction group")]
    InvalidBatchSize,
    #[error("amount overflows u64 after scaling to mint decimals")]
    AmountOverflow,
    #[error("invalid instruction schema: {0}")]
    InvalidSchema(String),

    #[error("{}", verbose_client_error(.0))]
    Rpc(#[from] ClientError),
    #[error(transparent)]
    Signer(#[from] SignerError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a single instruction could not be read back from history
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("instruction data too short: {0} bytes")]
    TooShort(usize),
    #[error("unknown instruction discriminator {0:?}")]
    UnknownDiscriminator([u8; 8]),
    #[error("invalid {name} payload: {source}")]
    InvalidPayload {
        name: &'static str,
        source: std::io::Error,
    },
    #[error("account role {role} missing at position {position}")]
    MissingAccount { role: &'static str, position: usize },
    #[error("memo is not valid UTF-8: {0}")]
    InvalidMemo(#[from] std::str::Utf8Error),
}

/// Renders an RPC error with the preflight simulation logs, if the node sent any.
pub fn verbose_client_error(err: &ClientError) -> String {
    if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
        code,
        message,
        data,
    }) = &err.kind
    {
        let mut s = String::new();
        let _ = writeln!(s, "{} ({})", message, code);
        if let RpcResponseErrorData::SendTransactionPreflightFailure(
            RpcSimulateTransactionResult {
                logs: Some(logs), ..
            },
        ) = data
        {
            for (i, log) in logs.iter().enumerate() {
                let _ = writeln!(s, "{}: {}", i + 1, log);
            }
        }
        s
    } else {
        err.to_string()
    }
}

/// Splits transport failures from ledger/program rejections of a submitted transaction.
pub fn classify_send_error(err: ClientError) -> GrantClientError {
    if let Some(tx_err) = err.get_transaction_error() {
        return GrantClientError::SubmissionRejected(tx_err.to_string());
    }
    match &err.kind {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { .. }) => {
            GrantClientError::SubmissionRejected(verbose_client_error(&err))
        }
        _ => GrantClientError::Rpc(err),
    }
}
