use common::ledger::{Bytes, LedgerError, PrimaryData, RecordError, H256};
use common::segment::{locate_segments, reconstruct, SegmentError};

use super::state::State;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("primary record not found")]
    NotFound,
    #[error("primary record data is corrupt: {0}")]
    CorruptPrimary(#[from] RecordError),
    #[error("primary record carries no kind key")]
    MissingKind,
    #[error("segment integrity failure: {0}")]
    Segments(SegmentError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<SegmentError> for ContentError {
    fn from(e: SegmentError) -> Self {
        match e {
            SegmentError::Ledger(e) => ContentError::Ledger(e),
            other => ContentError::Segments(other),
        }
    }
}

impl ContentError {
    /// Integrity failures are reported outward as "not found", per the
    /// serving boundary contract
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound
                | ContentError::CorruptPrimary(_)
                | ContentError::MissingKind
                | ContentError::Segments(_)
        )
    }
}

/// Resolved content ready to serve
#[derive(Debug, Clone)]
pub struct Content {
    /// reported content type, segmented suffix already stripped
    pub content_type: String,
    pub bytes: Bytes,
}

/// The outward read path: fetch the primary record by its kind hash and
/// hand back servable bytes.
///
/// Inline content is returned directly. A content type carrying the
/// segmented suffix routes through the locator and reconstructor
/// instead of reading inline data, and the suffix is stripped from the
/// reported type.
pub async fn serve(primary_id: &H256, state: &State) -> Result<Content, ContentError> {
    let live = state
        .ledger()
        .find_by_kind(primary_id)
        .await?
        .ok_or(ContentError::NotFound)?;

    let primary = PrimaryData::from_wire(&live.data)?;
    let content_type = primary.served_content_type().to_string();

    if !primary.is_segmented() {
        tracing::debug!(%primary_id, size = primary.content.len(), "serving inline content");
        return Ok(Content {
            content_type,
            bytes: Bytes::from(primary.content),
        });
    }

    let primary_kind = live.record.kind.as_ref().ok_or(ContentError::MissingKind)?;
    let records = locate_segments(primary_kind, state.protocol(), state.ledger().as_ref()).await?;
    let bytes = reconstruct(&records)?;
    tracing::debug!(
        %primary_id,
        segments = records.len(),
        size = bytes.len(),
        "serving reconstructed content"
    );
    Ok(Content {
        content_type,
        bytes,
    })
}
