use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Size of a ledger hash in bytes
pub const HASH_SIZE: usize = 32;

// Domain separation prefixes. Hashing the same bytes for two
// different purposes must never collide.
const OWNERSHIP_KEY_DOMAIN: &[u8] = b"lode-ownership-key";
const TRANSACTION_DOMAIN: &[u8] = b"lode-transaction";
const MESSAGE_DOMAIN: &[u8] = b"lode-signing-message";

/// Errors that can occur when parsing a hash
#[derive(Debug, thiserror::Error)]
pub enum H256ParseError {
    #[error("hash hex decode error")]
    HexDecode,
    #[error("invalid hash size, expected {HASH_SIZE}, got {0}")]
    InvalidSize(usize),
}

/// A 32-byte ledger hash
///
/// Identifies transactions, code references, and ownership keys.
/// Displayed and parsed as hex, with or without a "0x" prefix.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct H256(pub [u8; HASH_SIZE]);

impl H256 {
    /// Parse a hash from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex_str: &str) -> Result<Self, H256ParseError> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        if hex_str.len() != HASH_SIZE * 2 {
            return Err(H256ParseError::InvalidSize(hex_str.len() / 2));
        }
        let mut buff = [0; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut buff).map_err(|_| H256ParseError::HexDecode)?;
        Ok(H256(buff))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Hash canonical ownership-key bytes
    pub(crate) fn of_ownership_key(bytes: &[u8]) -> Self {
        Self::domain_hash(OWNERSHIP_KEY_DOMAIN, bytes)
    }

    /// Hash canonical transaction bytes
    pub(crate) fn of_transaction(bytes: &[u8]) -> Self {
        Self::domain_hash(TRANSACTION_DOMAIN, bytes)
    }

    /// Hash a transaction signing message
    pub(crate) fn of_signing_message(bytes: &[u8]) -> Self {
        Self::domain_hash(MESSAGE_DOMAIN, bytes)
    }

    fn domain_hash(domain: &[u8], bytes: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(bytes);
        H256(*hasher.finalize().as_bytes())
    }
}

impl From<[u8; HASH_SIZE]> for H256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        H256(bytes)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for H256 {
    type Err = H256ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
