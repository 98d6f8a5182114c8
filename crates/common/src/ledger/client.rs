use async_trait::async_trait;

use super::hash::H256;
use super::ownership::OwnershipKey;
use super::record::{LiveRecord, OutPoint};
use super::skeleton::{SignedTransaction, TransactionSkeleton};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("record not found: {0:?}")]
    RecordNotFound(OutPoint),
    #[error("insufficient funds: needed {needed} grains, available {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

/// Funding sources handed to the fee injector: the records a fee payer
/// may consume, and where change should be returned.
#[derive(Debug, Clone)]
pub struct FundingSources {
    pub fee_payer: OwnershipKey,
    pub change_to: OwnershipKey,
}

/// The generic ledger query/submit collaborator.
///
/// Consumed, never implemented, by the protocol core; the testkit ships
/// an in-memory implementation for integration tests.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// All live records whose ownership key matches `filter` exactly
    async fn collect(&self, filter: &OwnershipKey) -> Result<Vec<LiveRecord>, LedgerError>;

    /// Look up a single live record by out-point
    async fn get(&self, out_point: &OutPoint) -> Result<Option<LiveRecord>, LedgerError>;

    /// Look up the live record whose kind key hashes to `kind_hash`.
    /// Kind keys are unique per logical object, so at most one record
    /// matches.
    async fn find_by_kind(&self, kind_hash: &H256) -> Result<Option<LiveRecord>, LedgerError>;

    /// Submit a signed transaction, returning its identifier once the
    /// ledger has acknowledged it
    async fn submit(&self, tx: &SignedTransaction) -> Result<H256, LedgerError>;
}

/// The fee injection collaborator: takes an unfunded skeleton and
/// funding sources, returns a skeleton whose inputs cover reserved
/// capacity plus the transaction fee, with change appended.
#[async_trait]
pub trait FeeInjector: Send + Sync {
    async fn inject(
        &self,
        skeleton: TransactionSkeleton,
        funding: &FundingSources,
    ) -> Result<TransactionSkeleton, LedgerError>;
}
