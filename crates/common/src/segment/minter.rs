use std::sync::Arc;

use crate::ledger::{
    FeeInjector, FundingSources, LedgerClient, LedgerError, OwnershipKey, Record, SkeletonError,
    TransactionSkeleton, H256,
};
use crate::signer::{SignerError, SignerRegistry};

use super::encoder::{encode_segments, Segment};
use super::{ProtocolConfig, SegmentError};

#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("segment encoding failed: {0}")]
    Encoding(#[from] SegmentError),
    #[error("segment {index} mint failed: {source}")]
    SegmentFailed {
        index: u8,
        #[source]
        source: MintStepError,
    },
}

/// A failure while funding, signing, or submitting one segment
/// transaction. Aborts the remaining loop; completed segments stay on
/// the ledger (there is no rollback path).
#[derive(Debug, thiserror::Error)]
pub enum MintStepError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("signer error: {0}")]
    Signer(#[from] SignerError),
    #[error("skeleton error: {0}")]
    Skeleton(#[from] SkeletonError),
}

/// Derive the ownership key every segment record of a primary record
/// shares: the protocol's derivation code parameterized by the hash of
/// the primary record's kind key.
///
/// A pure function of the primary identity. The kind key is immutable
/// once the primary record is minted, so the derived key is stable for
/// its whole life, and segment discovery needs no central index.
pub fn segment_ownership_key(
    primary_kind: &OwnershipKey,
    proto: &ProtocolConfig,
) -> OwnershipKey {
    OwnershipKey::new(
        proto.segment_code_hash,
        proto.segment_hash_type,
        primary_kind.hash().as_bytes().to_vec(),
    )
}

/// Build the unsigned skeleton minting one segment record.
///
/// The record's data is the segment wire bytes and its capacity is set
/// to exactly the occupied minimum for that data length, never
/// over-provisioned. Both protocol code dependencies are attached
/// without duplicate entries. Funding is not handled here; the caller
/// passes the result through the fee injection collaborator.
pub fn build_segment_skeleton(
    primary_kind: &OwnershipKey,
    segment: &Segment,
    proto: &ProtocolConfig,
) -> TransactionSkeleton {
    let data = segment.to_wire();
    let mut record = Record {
        capacity: 0,
        ownership: segment_ownership_key(primary_kind, proto),
        kind: None,
    };
    record.capacity = record.occupied_capacity(data.len());

    TransactionSkeleton::new()
        .dependency(proto.segment_code_dep)
        .dependency(proto.signer_code_dep)
        .output(record, data)
}

/// Drives the full mint of a primary record's segments.
///
/// One transaction per segment, issued strictly sequentially: each
/// transaction consumes the prior transaction's change output, so a
/// submit must be acknowledged before the next skeleton is funded.
/// Nothing is retried; the first failure aborts the remaining loop and
/// reports which segment it stopped on.
pub struct MintDriver {
    ledger: Arc<dyn LedgerClient>,
    fee_injector: Arc<dyn FeeInjector>,
    signer: Arc<SignerRegistry>,
    proto: ProtocolConfig,
}

impl MintDriver {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        fee_injector: Arc<dyn FeeInjector>,
        signer: Arc<SignerRegistry>,
        proto: ProtocolConfig,
    ) -> Self {
        Self {
            ledger,
            fee_injector,
            signer,
            proto,
        }
    }

    /// Encode `content` and mint every segment under the key derived
    /// from `primary_kind`, returning the submitted transaction
    /// identifiers in segment order.
    pub async fn mint(
        &self,
        primary_kind: &OwnershipKey,
        content: &[u8],
        funding: &FundingSources,
    ) -> Result<Vec<H256>, MintError> {
        // index overflow surfaces here, before any network I/O
        let segments = encode_segments(content, self.proto.chunk_size)?;
        tracing::debug!(
            segments = segments.len(),
            chunk_size = self.proto.chunk_size,
            "minting segment records"
        );

        let mut tx_hashes = Vec::with_capacity(segments.len());
        for segment in &segments {
            let tx_hash = self
                .mint_segment(primary_kind, segment, funding)
                .await
                .map_err(|source| MintError::SegmentFailed {
                    index: segment.index,
                    source,
                })?;
            tracing::debug!(index = segment.index, %tx_hash, "segment record minted");
            tx_hashes.push(tx_hash);
        }
        Ok(tx_hashes)
    }

    /// Fund, sign, and submit one segment transaction
    async fn mint_segment(
        &self,
        primary_kind: &OwnershipKey,
        segment: &Segment,
        funding: &FundingSources,
    ) -> Result<H256, MintStepError> {
        let skeleton = build_segment_skeleton(primary_kind, segment, &self.proto);
        let funded = self.fee_injector.inject(skeleton, funding).await?;
        let signed = self.signer.sign_transaction(funded).await?;
        let tx_hash = self.ledger.submit(&signed).await?;
        Ok(tx_hash)
    }
}
