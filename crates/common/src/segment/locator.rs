use crate::ledger::{LedgerClient, LiveRecord, OwnershipKey};

use super::minter::segment_ownership_key;
use super::{ProtocolConfig, SegmentError};

/// Find every segment record belonging to a primary record.
///
/// Discovery is by ownership key, not by position: the derived key is
/// recomputed from the primary record's kind key and the ledger is asked
/// for an exact match. Results come back unsorted; ordering is the
/// reconstructor's job.
///
/// A primary record marked as segmented must have at least one segment,
/// so an empty result is a data-integrity failure, not "no content".
pub async fn locate_segments(
    primary_kind: &OwnershipKey,
    proto: &ProtocolConfig,
    ledger: &dyn LedgerClient,
) -> Result<Vec<LiveRecord>, SegmentError> {
    let key = segment_ownership_key(primary_kind, proto);
    let records = ledger.collect(&key).await?;
    if records.is_empty() {
        tracing::warn!(primary = %primary_kind.hash(), "segment records missing");
        return Err(SegmentError::SegmentsNotFound);
    }
    Ok(records)
}
