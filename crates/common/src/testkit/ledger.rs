use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::ledger::{
    Bytes, FeeInjector, FundingSources, LedgerClient, LedgerError, LiveRecord, OutPoint,
    OwnershipKey, Record, SignedTransaction, TransactionSkeleton, H256,
};

/// Flat transaction fee charged by the [`StaticFeeInjector`], in grains
pub const FLAT_FEE: u64 = 1_000;

/// An in-memory ledger: a map of live records keyed by out-point.
///
/// `submit` consumes the transaction's inputs and materializes its
/// outputs as live records, which is enough to model the sequential
/// change-output chain the mint driver depends on.
#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<HashMap<OutPoint, LiveRecord>>,
    submitted: Mutex<Vec<H256>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a genesis funding record owned by `ownership`
    pub fn seed(&self, ownership: OwnershipKey, capacity: u64) -> OutPoint {
        let tx_hash = H256(blake3::hash(ownership.hash().as_bytes()).into());
        let out_point = OutPoint::new(tx_hash, 0);
        let record = Record {
            capacity,
            ownership,
            kind: None,
        };
        self.records.lock().insert(
            out_point,
            LiveRecord {
                out_point,
                record,
                data: Bytes::new(),
            },
        );
        out_point
    }

    /// Insert an arbitrary live record, e.g. an already-minted primary
    pub fn insert(&self, record: Record, data: Bytes) -> OutPoint {
        let tx_hash = H256(blake3::hash(&data).into());
        let out_point = OutPoint::new(tx_hash, 0);
        self.records.lock().insert(
            out_point,
            LiveRecord {
                out_point,
                record,
                data,
            },
        );
        out_point
    }

    /// Hashes of every transaction submitted so far, in order
    pub fn submitted(&self) -> Vec<H256> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn collect(&self, filter: &OwnershipKey) -> Result<Vec<LiveRecord>, LedgerError> {
        let records = self.records.lock();
        let mut matches: Vec<LiveRecord> = records
            .values()
            .filter(|live| &live.record.ownership == filter)
            .cloned()
            .collect();
        // hash-map iteration order is arbitrary; keep results stable for
        // assertions without imposing segment order
        matches.sort_by_key(|live| live.out_point.tx_hash);
        Ok(matches)
    }

    async fn get(&self, out_point: &OutPoint) -> Result<Option<LiveRecord>, LedgerError> {
        Ok(self.records.lock().get(out_point).cloned())
    }

    async fn find_by_kind(&self, kind_hash: &H256) -> Result<Option<LiveRecord>, LedgerError> {
        let records = self.records.lock();
        Ok(records
            .values()
            .find(|live| {
                live.record
                    .kind
                    .as_ref()
                    .is_some_and(|kind| &kind.hash() == kind_hash)
            })
            .cloned())
    }

    async fn submit(&self, tx: &SignedTransaction) -> Result<H256, LedgerError> {
        let tx_hash = tx.hash();
        let mut records = self.records.lock();

        for input in tx.skeleton().inputs() {
            if records.remove(&input.previous_output).is_none() {
                return Err(LedgerError::Rejected(format!(
                    "input not live: {:?}",
                    input.previous_output
                )));
            }
        }
        for (index, (record, data)) in tx.skeleton().outputs().iter().enumerate() {
            let out_point = OutPoint::new(tx_hash, index as u32);
            records.insert(
                out_point,
                LiveRecord {
                    out_point,
                    record: record.clone(),
                    data: data.clone(),
                },
            );
        }
        self.submitted.lock().push(tx_hash);
        Ok(tx_hash)
    }
}

/// Fee injection against a [`MemoryLedger`]: consumes the fee payer's
/// first live record large enough to cover the skeleton's reserved
/// capacity plus a flat fee, and appends the change output.
pub struct StaticFeeInjector {
    ledger: Arc<MemoryLedger>,
}

impl StaticFeeInjector {
    pub fn new(ledger: Arc<MemoryLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl FeeInjector for StaticFeeInjector {
    async fn inject(
        &self,
        skeleton: TransactionSkeleton,
        funding: &FundingSources,
    ) -> Result<TransactionSkeleton, LedgerError> {
        let needed: u64 =
            skeleton.outputs().iter().map(|(r, _)| r.capacity).sum::<u64>() + FLAT_FEE;

        let candidates = self.ledger.collect(&funding.fee_payer).await?;
        let source = candidates
            .iter()
            .find(|live| live.record.capacity >= needed)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                needed,
                available: candidates.iter().map(|l| l.record.capacity).max().unwrap_or(0),
            })?;

        let change = Record {
            capacity: source.record.capacity - needed,
            ownership: funding.change_to.clone(),
            kind: None,
        };
        Ok(skeleton
            .input(source.out_point, source.record.ownership.clone())
            .output(change, Bytes::new()))
    }
}
