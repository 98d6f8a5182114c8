mod encoder;
mod locator;
mod minter;
mod reconstructor;

pub use encoder::{encode_segments, Segment, MAX_SEGMENTS};
pub use locator::locate_segments;
pub use minter::{build_segment_skeleton, segment_ownership_key, MintDriver, MintError};
pub use reconstructor::reconstruct;

use crate::ledger::{Dependency, KeyHashType, LedgerError, H256};

/// Default chunk size in bytes, chosen so one chunk plus fixed
/// transaction overhead stays inside ledger size limits.
pub const DEFAULT_CHUNK_SIZE: usize = 10_240;

/// Environment-supplied protocol constants.
///
/// Known ahead of time, never computed per call: the on-ledger location
/// of the segment derivation code and of the fee payer's signing code.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// code hash of the segment ownership derivation module
    pub segment_code_hash: H256,
    /// how that code hash resolves
    pub segment_hash_type: KeyHashType,
    /// on-ledger reference to the derivation module's code
    pub segment_code_dep: Dependency,
    /// on-ledger reference to the fee payer's signing module
    pub signer_code_dep: Dependency,
    /// chunk size used when encoding content into segments
    pub chunk_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("chunk size must be positive")]
    InvalidChunkSize,
    #[error("content requires {needed} segments, at most {MAX_SEGMENTS} are addressable")]
    TooManySegments { needed: usize },
    #[error("segment record carries no payload beyond its index byte")]
    ShortRecord,
    #[error("duplicate segment index {0}")]
    DuplicateIndex(u8),
    #[error("no segment records found for primary record")]
    SegmentsNotFound,
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
