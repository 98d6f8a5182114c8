/**
 * Ledger data model.
 *  - Records (outputs), ownership keys, out-points
 *  - Immutable transaction skeleton builder
 *  - Hashing and wire formats
 */
pub mod ledger;
/**
 * Segmentation & reconstruction protocol.
 * Splits oversized content into indexed chunk records
 *  minted under a deterministically derived ownership key,
 *  and rebuilds the original bytes on read.
 */
pub mod segment;
/**
 * Signer abstraction.
 * One connector interface over two authorization schemes:
 *  key-based ECDSA signing and challenge/response session
 *  signing.
 */
pub mod signer;
/**
 * In-process fakes for integration tests: memory ledger,
 *  static fee injector, deterministic signers.
 */
pub mod testkit;

pub mod prelude {
    pub use crate::ledger::{
        Bytes, LiveRecord, OutPoint, OwnershipKey, Record, TransactionSkeleton, H256,
    };
    pub use crate::segment::{encode_segments, locate_segments, reconstruct, Segment};
    pub use crate::signer::{Connector, ConnectorKind, SignerRegistry};
}
