use crate::batch::InstructionBatcher;
use crate::constants::SIGNATURE_PAGE_LIMIT;
use crate::error::{GrantClientError, Result};
use crate::event::GrantTransferRecord;
use crate::history::HistoryDecoder;
use crate::instructions::*;
use crate::ledger::LedgerClient;
use crate::pda::DistributorAddresses;
use crate::program::DistributionProgram;
use crate::state::DistributorAccount;
use crate::utils::*;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_spl::token::spl_token::state::Mint;
use futures::future::join_all;
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::collections::HashSet;
use std::sync::Arc;

pub type SharedSigner = Arc<dyn Signer + Send + Sync>;

/// Who signs for an authority role of an instruction
#[derive(Clone)]
pub enum GrantSigner {
    /// The client's operator identity, which also pays fees
    Operator,
    External(SharedSigner),
}

impl GrantSigner {
    pub fn external<S: Signer + Send + Sync + 'static>(signer: S) -> Self {
        Self::External(Arc::new(signer))
    }
}

impl std::fmt::Debug for GrantSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator => f.write_str("Operator"),
            Self::External(signer) => f.debug_tuple("External").field(&signer.pubkey()).finish(),
        }
    }
}

/// Exchange rule from grant balance to reward payout, owned by the program deployment
pub trait RedemptionPolicy: Send + Sync {
    fn payout(&self, grant_balance: u64) -> u64;
}

/// Whole tokens of budget for one distributor authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAllocation {
    pub authority: Pubkey,
    pub amount: u64,
}

/// Result of `prepare_distribution_asset`: the new mint and one outcome per submitted transaction
#[derive(Debug)]
pub struct DistributionAssetSetup {
    pub distribution_asset: Pubkey,
    /// Mint creation first, then the token account batches in order
    pub submissions: Vec<Result<Signature>>,
}

impl DistributionAssetSetup {
    /// Fails with the first rejected submission.
    pub fn into_result(self) -> Result<(Pubkey, Vec<Signature>)> {
        let signatures = self.submissions.into_iter().collect::<Result<Vec<_>>>()?;
        Ok((self.distribution_asset, signatures))
    }
}

/**
 * Grant distributor client
 *
 * Builds and submits the lifecycle transactions of a campaign:
 * 1. `prepare_distribution_asset` + `mint_distribution_budget`
 * 2. `create_distributor` + `fund_reward_vault`
 * 3. `assign_grant` while the distribution period is open
 * 4. `redeem_grant` once the redemption period has started
 * 5. optionally `freeze_grant` to block a grant account
 *
 * The client caches nothing between calls. Time windows, double
 * initialization and frozen accounts are enforced by the program when a
 * transaction is submitted and surface as `SubmissionRejected`.
 */
pub struct GrantClient<L> {
    ledger: L,
    program: DistributionProgram,
    operator: SharedSigner,
    batcher: InstructionBatcher,
    page_limit: usize,
}

impl<L: LedgerClient> GrantClient<L> {
    pub fn new(ledger: L, program: DistributionProgram, operator: SharedSigner) -> Self {
        Self {
            ledger,
            program,
            operator,
            batcher: InstructionBatcher::default(),
            page_limit: SIGNATURE_PAGE_LIMIT,
        }
    }

    pub fn with_batcher(mut self, batcher: InstructionBatcher) -> Self {
        self.batcher = batcher;
        self
    }

    pub fn with_page_limit(mut self, page_limit: usize) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn operator(&self) -> Pubkey {
        self.operator.pubkey()
    }

    pub fn signer_pubkey(&self, signer: &GrantSigner) -> Pubkey {
        self.resolve(signer).pubkey()
    }

    pub fn derive_distributor_accounts(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<DistributorAddresses> {
        self.program.deriver().distributor_accounts(dist_mint, reward_mint)
    }

    pub fn derive_grant_account(&self, distributor: &Pubkey, receiver: &Pubkey) -> Result<(Pubkey, u8)> {
        self.program.deriver().grant_account(distributor, receiver)
    }

    /// Creates a distribution mint with the reward mint's decimals and token accounts for
    /// every recipient that lacks one.
    ///
    /// All transactions are signed up front and sent in order; a failing transaction does
    /// not stop the others, so check every entry of `submissions`.
    pub async fn prepare_distribution_asset(
        &self,
        reward_mint: &Pubkey,
        recipients: &[Pubkey],
        governing_authority: Option<Pubkey>,
    ) -> Result<DistributionAssetSetup> {
        let payer = self.operator();
        let governing_authority = governing_authority.unwrap_or(payer);
        let decimals = self.mint_decimals(reward_mint).await?;
        let rent = self.ledger.minimum_balance_for_rent_exemption(Mint::LEN).await?;

        let dist_mint = Keypair::new();
        let dist_mint_key = dist_mint.pubkey();

        let mut seen = HashSet::new();
        let recipients: Vec<Pubkey> = recipients
            .iter()
            .copied()
            .filter(|r| seen.insert(*r))
            .collect();

        let lookups = join_all(recipients.iter().map(|owner| async move {
            let token_account = associated_token_address(&dist_mint_key, owner);
            self.ledger.account_exists(&token_account).await
        }))
        .await;

        let mut groups = Vec::with_capacity(recipients.len());
        for (owner, exists) in recipients.iter().zip(lookups) {
            if exists? {
                groups.push(vec![]);
            } else {
                groups.push(vec![create_associated_token_account(&payer, owner, &dist_mint_key)]);
            }
        }

        let recent_blockhash = self.ledger.latest_blockhash().await?;
        let mint_ixs = create_mint(&payer, &dist_mint_key, &governing_authority, decimals, rent)?;
        let mut transactions = vec![self.signed_transaction(&mint_ixs, &[&dist_mint], recent_blockhash)?];
        for mut tx in self.batcher.batch(groups, &payer, recent_blockhash) {
            self.sign(&mut tx, &[], recent_blockhash)?;
            transactions.push(tx);
        }

        tracing::debug!(
            dist_mint = %dist_mint_key,
            %reward_mint,
            decimals,
            transactions = transactions.len(),
            "prepare distribution mint"
        );

        let mut submissions = Vec::with_capacity(transactions.len());
        for tx in &transactions {
            let outcome = self.ledger.send_transaction(tx).await;
            match &outcome {
                Ok(signature) => tracing::info!(dist_mint = %dist_mint_key, %signature, "submitted"),
                Err(err) => tracing::warn!(dist_mint = %dist_mint_key, %err, "submission failed"),
            }
            submissions.push(outcome);
        }

        Ok(DistributionAssetSetup {
            distribution_asset: dist_mint_key,
            submissions,
        })
    }

    /// One `mint_to` per allocation, scaled by the reward mint's decimals.
    pub async fn mint_budget_instructions(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        allocations: &[BudgetAllocation],
        governing_authority: &Pubkey,
    ) -> Result<Vec<Instruction>> {
        let decimals = self.mint_decimals(reward_mint).await?;
        allocations
            .iter()
            .map(|allocation| {
                let token_account = associated_token_address(dist_mint, &allocation.authority);
                let amount = scale_amount(allocation.amount, decimals)?;
                mint_to(dist_mint, &token_account, governing_authority, amount)
            })
            .collect()
    }

    /// Requires the allocations' token accounts to exist already.
    pub async fn mint_distribution_budget(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        allocations: &[BudgetAllocation],
        governing_authority: &GrantSigner,
    ) -> Result<Signature> {
        let authority = self.signer_pubkey(governing_authority);
        let instructions = self
            .mint_budget_instructions(dist_mint, reward_mint, allocations, &authority)
            .await?;
        self.submit(&instructions, &[governing_authority]).await
    }

    /// Initializes the distributor, grant mint and reward vault. Returns the distributor address.
    pub async fn create_distributor(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        freeze_authority: &GrantSigner,
        dist_end_ts: i64,
        redeem_start_ts: i64,
    ) -> Result<Pubkey> {
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let accounts = InitializeDistributor {
            payer: self.operator(),
            freeze_authority: self.signer_pubkey(freeze_authority),
            dist_mint: *dist_mint,
            reward_mint: *reward_mint,
            distributor_account: addresses.distributor,
            grant_mint: addresses.grant_mint,
            reward_vault: addresses.reward_vault,
        };
        let args = InitializeDistributorArgs {
            dist_end_ts,
            redeem_start_ts,
            bumps: addresses.bumps,
        };

        tracing::debug!(
            freeze_authority = %accounts.freeze_authority,
            %dist_mint,
            %reward_mint,
            distributor = %addresses.distributor,
            grant_mint = %addresses.grant_mint,
            reward_vault = %addresses.reward_vault,
            "initialize_distributor"
        );

        let ix = initialize_distributor(self.program.id(), &accounts, &args);
        self.submit(&[ix], &[freeze_authority]).await?;
        Ok(addresses.distributor)
    }

    /// Moves `amount` reward tokens from the operator's token account into the reward vault.
    pub async fn fund_reward_vault(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let source = associated_token_address(reward_mint, &self.operator());
        tracing::debug!(%source, reward_vault = %addresses.reward_vault, amount, "fund reward vault");
        let ix = transfer(&source, &addresses.reward_vault, &self.operator(), amount)?;
        self.submit(&[ix], &[]).await
    }

    /// Transfers `amount` of the donor's distribution tokens into the receiver's grant,
    /// creating the grant account first when it does not exist yet. Returns the grant account.
    ///
    /// Any `Some` memo is sent verbatim, the empty string included, so `get_grants` returns it unchanged.
    pub async fn assign_grant(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        receiver_authority: &Pubkey,
        amount: u64,
        memo: Option<&str>,
        donor: &GrantSigner,
    ) -> Result<Pubkey> {
        let payer = self.operator();
        let donor_authority = self.signer_pubkey(donor);
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let (grant_account, bump) = self.derive_grant_account(&addresses.distributor, receiver_authority)?;

        let mut instructions = Vec::with_capacity(3);

        if !self.ledger.account_exists(&grant_account).await? {
            tracing::debug!(
                distributor = %addresses.distributor,
                %grant_account,
                "initialize_grant"
            );
            let accounts = InitializeGrant {
                payer,
                donor_authority,
                receiver_authority: *receiver_authority,
                distributor_account: addresses.distributor,
                grant_mint: addresses.grant_mint,
                grant_account,
            };
            instructions.push(initialize_grant(
                self.program.id(),
                &accounts,
                &InitializeGrantArgs { bump },
            ));
        }

        let dist_token = associated_token_address(dist_mint, &donor_authority);
        tracing::debug!(
            distributor = %addresses.distributor,
            %grant_account,
            %dist_token,
            amount,
            "transfer_grant"
        );
        let accounts = TransferGrant {
            payer,
            donor_authority,
            receiver_authority: *receiver_authority,
            distributor_account: addresses.distributor,
            dist_mint: *dist_mint,
            dist_token,
            grant_mint: addresses.grant_mint,
            grant_account,
        };
        instructions.push(transfer_grant(
            self.program.id(),
            &accounts,
            &TransferGrantArgs { amount, bump },
        ));

        if let Some(text) = memo {
            tracing::debug!(memo = text, "memo");
            instructions.push(crate::instructions::memo(text));
        }

        self.submit(&instructions, &[donor]).await?;
        Ok(grant_account)
    }

    /// Redeems the receiver's whole grant balance for reward tokens, creating the receiver's
    /// reward token account first when needed.
    pub async fn redeem_grant(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        receiver: &GrantSigner,
    ) -> Result<Signature> {
        let payer = self.operator();
        let receiver_authority = self.signer_pubkey(receiver);
        let receiver_token_account = associated_token_address(reward_mint, &receiver_authority);

        let mut instructions = Vec::with_capacity(2);
        if !self.ledger.account_exists(&receiver_token_account).await? {
            tracing::debug!(%receiver_token_account, "create reward token account");
            instructions.push(create_associated_token_account(
                &payer,
                &receiver_authority,
                reward_mint,
            ));
        }

        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let (grant_account, bump) = self.derive_grant_account(&addresses.distributor, &receiver_authority)?;
        tracing::debug!(
            distributor = %addresses.distributor,
            %grant_account,
            %receiver_token_account,
            "redeem_grant"
        );
        let accounts = RedeemGrant {
            payer,
            receiver_authority,
            distributor_account: addresses.distributor,
            grant_mint: addresses.grant_mint,
            grant_account,
            reward_mint: *reward_mint,
            reward_vault: addresses.reward_vault,
            receiver_token_account,
        };
        instructions.push(redeem_grant(
            self.program.id(),
            &accounts,
            &RedeemGrantArgs { bump },
        ));

        self.submit(&instructions, &[receiver]).await
    }

    /// Freezes the receiver's grant account; signed by the grant mint's freeze authority.
    pub async fn freeze_grant(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        receiver_authority: &Pubkey,
        freeze_authority: &GrantSigner,
    ) -> Result<Signature> {
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let (grant_account, _) = self.derive_grant_account(&addresses.distributor, receiver_authority)?;
        tracing::debug!(%grant_account, grant_mint = %addresses.grant_mint, "freeze grant");
        let ix = freeze_account(
            &grant_account,
            &addresses.grant_mint,
            &self.signer_pubkey(freeze_authority),
        )?;
        self.submit(&[ix], &[freeze_authority]).await
    }

    pub async fn fetch_distributor(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<Option<DistributorAccount>> {
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let Some(account) = self.ledger.get_account(&addresses.distributor).await? else {
            return Ok(None);
        };
        if account.owner != *self.program.id() {
            return Err(GrantClientError::InvalidAccountData(addresses.distributor));
        }
        DistributorAccount::try_from_account_data(&account.data)
            .map(Some)
            .ok_or(GrantClientError::InvalidAccountData(addresses.distributor))
    }

    /// Current grant balance of the receiver; zero while no grant account exists.
    pub async fn grant_balance(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        receiver_authority: &Pubkey,
    ) -> Result<u64> {
        let addresses = self.derive_distributor_accounts(dist_mint, reward_mint)?;
        let (grant_account, _) = self.derive_grant_account(&addresses.distributor, receiver_authority)?;
        match self.ledger.get_account(&grant_account).await? {
            Some(account) => Ok(unpack_token_account(&grant_account, &account)?.amount),
            None => Ok(0),
        }
    }

    /// What `redeem_grant` would pay out right now under `policy`.
    pub async fn preview_redemption(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
        receiver_authority: &Pubkey,
        policy: &dyn RedemptionPolicy,
    ) -> Result<u64> {
        let balance = self
            .grant_balance(dist_mint, reward_mint, receiver_authority)
            .await?;
        Ok(policy.payout(balance))
    }

    /// Every grant transfer of the campaign, ordered by slot.
    pub async fn get_grants(
        &self,
        dist_mint: &Pubkey,
        reward_mint: &Pubkey,
    ) -> Result<Vec<GrantTransferRecord>> {
        HistoryDecoder::new(&self.ledger, self.program)
            .with_page_limit(self.page_limit)
            .get_grants(dist_mint, reward_mint)
            .await
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
        let account = self
            .ledger
            .get_account(mint)
            .await?
            .ok_or(GrantClientError::AccountNotFound(*mint))?;
        Ok(unpack_mint(mint, &account)?.decimals)
    }

    fn resolve<'a>(&'a self, signer: &'a GrantSigner) -> &'a dyn Signer {
        match signer {
            GrantSigner::Operator => self.operator.as_ref(),
            GrantSigner::External(signer) => signer.as_ref(),
        }
    }

    /// Signs with the operator plus `extra`, skipping signers whose key is already present.
    fn sign(&self, tx: &mut Transaction, extra: &[&dyn Signer], recent_blockhash: Hash) -> Result<()> {
        let mut signers: Vec<&dyn Signer> = Vec::with_capacity(1 + extra.len());
        signers.push(self.operator.as_ref());
        for signer in extra {
            let key = signer.pubkey();
            if !signers.iter().any(|s| s.pubkey() == key) {
                signers.push(*signer);
            }
        }
        tx.try_sign(&signers, recent_blockhash)?;
        Ok(())
    }

    fn signed_transaction(
        &self,
        instructions: &[Instruction],
        extra: &[&dyn Signer],
        recent_blockhash: Hash,
    ) -> Result<Transaction> {
        let mut tx = Transaction::new_with_payer(instructions, Some(&self.operator()));
        self.sign(&mut tx, extra, recent_blockhash)?;
        Ok(tx)
    }

    async fn submit(&self, instructions: &[Instruction], signers: &[&GrantSigner]) -> Result<Signature> {
        let recent_blockhash = self.ledger.latest_blockhash().await?;
        let tx = {
            let extra: Vec<&dyn Signer> = signers.iter().map(|s| self.resolve(s)).collect();
            self.signed_transaction(instructions, &extra, recent_blockhash)?
        };
        let signature = self.ledger.send_transaction(&tx).await?;
        tracing::info!(%signature, instructions = instructions.len(), "submitted");
        Ok(signature)
    }
}
