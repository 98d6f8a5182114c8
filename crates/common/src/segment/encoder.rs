use crate::ledger::Bytes;

use super::SegmentError;

/// The maximum number of segments addressable by a one-byte index
pub const MAX_SEGMENTS: usize = 256;

/// One indexed chunk of an oversized payload
///
/// `index` is assigned by chunk position at encode time: 0-based,
/// strictly increasing, no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: u8,
    pub payload: Bytes,
}

impl Segment {
    /// Record wire format: `bytes[0]` = index, `bytes[1..]` = payload
    pub fn to_wire(&self) -> Bytes {
        let mut wire = Vec::with_capacity(1 + self.payload.len());
        wire.push(self.index);
        wire.extend_from_slice(&self.payload);
        Bytes::from(wire)
    }

    /// Parse record data back into a segment.
    ///
    /// Total length must be greater than one: a record with no payload
    /// beyond the index byte is a data-integrity failure.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, SegmentError> {
        if bytes.len() <= 1 {
            return Err(SegmentError::ShortRecord);
        }
        Ok(Segment {
            index: bytes[0],
            payload: Bytes::copy_from_slice(&bytes[1..]),
        })
    }
}

/// Split `content` into indexed `chunk_size`-byte segments.
///
/// Pure, no I/O. Zero-length content yields zero segments; the caller is
/// responsible for special-casing content that fits inline. Content
/// needing more than [`MAX_SEGMENTS`] chunks fails fast before any
/// segment is produced, never silently truncates.
pub fn encode_segments(content: &[u8], chunk_size: usize) -> Result<Vec<Segment>, SegmentError> {
    if chunk_size == 0 {
        return Err(SegmentError::InvalidChunkSize);
    }
    let needed = content.len().div_ceil(chunk_size);
    if needed > MAX_SEGMENTS {
        return Err(SegmentError::TooManySegments { needed });
    }
    Ok(content
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, window)| Segment {
            index: i as u8,
            payload: Bytes::copy_from_slice(window),
        })
        .collect())
}
