mod client;
mod hash;
mod ownership;
mod record;
mod skeleton;

pub use client::{FeeInjector, FundingSources, LedgerClient, LedgerError};
pub use hash::{H256, H256ParseError, HASH_SIZE};
pub use ownership::{KeyHashType, OwnershipKey};
pub use record::{
    DepKind, Dependency, LiveRecord, OutPoint, PrimaryData, Record, RecordError, GRAINS_PER_BYTE,
};
pub use skeleton::{
    SignedTransaction, SkeletonError, TransactionInput, TransactionSkeleton, WitnessEnvelope,
};

/// Raw payload buffer type used across the ledger model.
pub type Bytes = bytes::Bytes;
