use serde::{Deserialize, Serialize};

use super::hash::H256;

/// How an ownership key's `code_hash` resolves to on-ledger code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyHashType {
    /// `code_hash` is the hash of the code record's data
    Data,
    /// `code_hash` is the hash of the code record's own kind key
    Code,
}

/// The predicate under which a record may be consumed (a lock),
/// and equally the type identifier of a record (a kind key).
///
/// `args` parameterize the code referenced by `code_hash`; for
/// segment records they hold the hash of the primary record's
/// kind key, which is what makes segment discovery a pure
/// function of the primary record's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnershipKey {
    pub code_hash: H256,
    pub hash_type: KeyHashType,
    pub args: Vec<u8>,
}

impl OwnershipKey {
    pub fn new(code_hash: H256, hash_type: KeyHashType, args: Vec<u8>) -> Self {
        Self {
            code_hash,
            hash_type,
            args,
        }
    }

    /// Hash of the canonical serialization of this key
    ///
    /// Deterministic: equal keys hash equal, and the hash is stable for
    /// the life of the key. Used both as a record identity and as the
    /// derivation seed for dependent segment records.
    pub fn hash(&self) -> H256 {
        let bytes = bincode::serialize(self).expect("ownership key serialization is infallible");
        H256::of_ownership_key(&bytes)
    }

    /// Serialized footprint in bytes, as counted toward a record's
    /// occupied capacity: code hash + one hash-type byte + args.
    pub fn footprint(&self) -> u64 {
        32 + 1 + self.args.len() as u64
    }
}
