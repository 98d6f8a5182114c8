use serde::{Deserialize, Serialize};

use super::hash::H256;
use super::ownership::OwnershipKey;
use super::record::{Dependency, OutPoint, Record};
use super::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum SkeletonError {
    #[error("skeleton error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("witness codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("transaction has no outputs")]
    NoOutputs,
}

/// A record consumed by a transaction, carried with its resolved
/// ownership key so signers can match authorization slots to inputs
/// without a ledger round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_output: OutPoint,
    pub ownership: OwnershipKey,
}

/// The fixed wrapper format packed into an authorization slot.
///
/// Only the `authorization` field is covered by this protocol; the shape
/// is stable so that slot contents from both signing schemes deserialize
/// uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WitnessEnvelope {
    pub authorization: Option<Vec<u8>>,
}

impl WitnessEnvelope {
    pub fn new(authorization: Vec<u8>) -> Self {
        Self {
            authorization: Some(authorization),
        }
    }

    /// An empty placeholder slot, used to keep slot-to-input alignment
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn to_wire(&self) -> Vec<u8> {
        bincode::serialize(self).expect("witness envelope serialization is infallible")
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self, SkeletonError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// An in-progress, not-yet-authorized transaction.
///
/// Every build step returns a new skeleton value; nothing is mutated in
/// place. This keeps the sequential per-segment mint loop free of
/// aliasing between the skeleton being funded, signed, and submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSkeleton {
    inputs: Vec<TransactionInput>,
    outputs: Vec<(Record, Bytes)>,
    dependencies: Vec<Dependency>,
    witnesses: Vec<Vec<u8>>,
}

impl TransactionSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input consuming `previous_output`, locked by `ownership`
    pub fn input(mut self, previous_output: OutPoint, ownership: OwnershipKey) -> Self {
        self.inputs.push(TransactionInput {
            previous_output,
            ownership,
        });
        self
    }

    /// Append an output record with its stored data
    pub fn output(mut self, record: Record, data: Bytes) -> Self {
        self.outputs.push((record, data));
        self
    }

    /// Attach an external code dependency, skipping duplicates
    pub fn dependency(mut self, dep: Dependency) -> Self {
        if !self.dependencies.contains(&dep) {
            self.dependencies.push(dep);
        }
        self
    }

    /// Append an authorization slot
    pub fn witness(mut self, witness: Vec<u8>) -> Self {
        self.witnesses.push(witness);
        self
    }

    /// Place a witness at `index`, backfilling any missing intermediate
    /// slots with empty placeholders so slots stay aligned with inputs.
    pub fn set_witness(mut self, index: usize, witness: Vec<u8>) -> Self {
        while self.witnesses.len() <= index {
            self.witnesses.push(WitnessEnvelope::empty().to_wire());
        }
        self.witnesses[index] = witness;
        self
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[(Record, Bytes)] {
        &self.outputs
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn witnesses(&self) -> &[Vec<u8>] {
        &self.witnesses
    }

    /// Transaction hash over inputs, outputs, and dependencies.
    ///
    /// Witnesses are excluded so that packing a signature does not change
    /// the identity the signature commits to.
    pub fn hash(&self) -> H256 {
        let body = (&self.inputs, &self.outputs, &self.dependencies);
        let bytes = bincode::serialize(&body).expect("skeleton serialization is infallible");
        H256::of_transaction(&bytes)
    }

    /// The canonical message a connector signs: the transaction hash
    /// followed by every witness slot present before signing.
    pub fn signing_message(&self) -> H256 {
        let mut bytes = Vec::with_capacity(32 + self.witnesses.iter().map(Vec::len).sum::<usize>());
        bytes.extend_from_slice(self.hash().as_bytes());
        for witness in &self.witnesses {
            bytes.extend_from_slice(&(witness.len() as u64).to_le_bytes());
            bytes.extend_from_slice(witness);
        }
        H256::of_signing_message(&bytes)
    }

    /// Resolve into a signed transaction once authorization slots are
    /// packed. Fails on a skeleton that would create nothing.
    pub fn into_signed(self) -> Result<SignedTransaction, SkeletonError> {
        if self.outputs.is_empty() {
            return Err(SkeletonError::NoOutputs);
        }
        Ok(SignedTransaction { skeleton: self })
    }
}

/// A fully authorized transaction, ready for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    skeleton: TransactionSkeleton,
}

impl SignedTransaction {
    pub fn hash(&self) -> H256 {
        self.skeleton.hash()
    }

    pub fn skeleton(&self) -> &TransactionSkeleton {
        &self.skeleton
    }
}
