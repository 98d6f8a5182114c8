use serde::{Deserialize, Serialize};

use super::hash::H256;
use super::ownership::OwnershipKey;
use super::Bytes;

/// Capacity units reserved per byte of serialized record footprint
pub const GRAINS_PER_BYTE: u64 = 100_000_000;

/// Content-type suffix marking a primary record whose payload lives in
/// segment records rather than inline (`<original-type>+segmented`).
pub const SEGMENTED_SUFFIX: &str = "+segmented";

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("record data codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// A reference to a record by the transaction that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_hash: H256,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: H256, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

/// How a dependency's out-point is interpreted when resolving code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepKind {
    /// The record itself holds the code
    Code,
    /// The record holds a group of out-points to dereference
    Group,
}

/// An external code reference attached to a transaction's dependency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub out_point: OutPoint,
    pub dep_kind: DepKind,
}

/// One ledger output: reserved capacity, an ownership key (lock), and an
/// optional kind key (type identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// reserved capacity in grains
    pub capacity: u64,
    pub ownership: OwnershipKey,
    pub kind: Option<OwnershipKey>,
}

impl Record {
    /// Minimum viable capacity for this record carrying `data_len` bytes
    ///
    /// A pure function of the serialized footprint: the 8-byte capacity
    /// field, the ownership key, the kind key if present, and the data.
    /// Segment records are minted at exactly this value.
    pub fn occupied_capacity(&self, data_len: usize) -> u64 {
        let kind_footprint = self.kind.as_ref().map(|k| k.footprint()).unwrap_or(0);
        (8 + self.ownership.footprint() + kind_footprint + data_len as u64) * GRAINS_PER_BYTE
    }
}

/// A located on-ledger record together with its stored data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRecord {
    pub out_point: OutPoint,
    pub record: Record,
    pub data: Bytes,
}

/// Data layout of a primary record
///
/// When `content_type` carries the [`SEGMENTED_SUFFIX`], `content` is
/// empty and readers must locate and reconstruct segment records instead
/// of reading inline data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryData {
    pub content_type: String,
    pub content: Vec<u8>,
}

impl PrimaryData {
    /// An inline primary record: content fits without segmentation
    pub fn inline(content_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            content,
        }
    }

    /// A segmented primary record: empty inline content, suffixed type
    pub fn segmented(content_type: &str) -> Self {
        Self {
            content_type: format!("{}{}", content_type, SEGMENTED_SUFFIX),
            content: Vec::new(),
        }
    }

    pub fn is_segmented(&self) -> bool {
        self.content_type.ends_with(SEGMENTED_SUFFIX)
    }

    /// The content type to report outward, suffix stripped
    pub fn served_content_type(&self) -> &str {
        self.content_type
            .strip_suffix(SEGMENTED_SUFFIX)
            .unwrap_or(&self.content_type)
    }

    pub fn to_wire(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_wire(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
