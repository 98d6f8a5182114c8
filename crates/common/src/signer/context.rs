use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::{KeyHashType, OwnershipKey, H256};

/// The connected identity: the hash of the connecting key's ownership
/// key, displayed as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub H256);

impl Address {
    pub fn of(ownership: &OwnershipKey) -> Self {
        Address(ownership.hash())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which class of credential a session key is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionKeyKind {
    /// the account's primary credential
    Primary,
    /// a short-lived delegated key, subject to expiry checks
    Delegated,
}

/// A session key's type and validity window.
///
/// `expires_at` is a ledger timestamp in milliseconds; the
/// challenge/response connector refuses to sign past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub kind: SessionKeyKind,
    pub expires_at: u64,
}

/// Derivation parameters for an alternate ownership key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateKeyParams {
    pub code_hash: H256,
    pub hash_type: KeyHashType,
}

/// Per-session authorization state.
///
/// Constructed on connect and owned by the active connector; read, never
/// mutated, by the minting and locating paths. Persistence across
/// restarts is an explicit load/save of this value at session
/// boundaries, not ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    pub address: Address,
    /// the connecting key's ownership key, matched against transaction
    /// inputs when locating an authorization slot
    pub ownership: OwnershipKey,
    pub session: Option<SessionCredential>,
}

impl AuthorizationContext {
    pub fn new(ownership: OwnershipKey, session: Option<SessionCredential>) -> Self {
        Self {
            address: Address::of(&ownership),
            ownership,
            session,
        }
    }

    /// Derive an alternate ownership key for this identity: the
    /// parameterized code, keyed by the same args as the connecting key.
    /// Deterministic per (params, identity) pair.
    pub fn derive_alternate_ownership_key(&self, params: &AlternateKeyParams) -> OwnershipKey {
        OwnershipKey::new(params.code_hash, params.hash_type, self.ownership.args.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ownership() -> OwnershipKey {
        OwnershipKey::new(H256([6u8; 32]), KeyHashType::Data, vec![1, 2, 3])
    }

    #[test]
    fn test_address_is_key_hash() {
        let ctx = AuthorizationContext::new(ownership(), None);
        assert_eq!(ctx.address, Address(ownership().hash()));
    }

    #[test]
    fn test_alternate_key_keeps_args() {
        let ctx = AuthorizationContext::new(ownership(), None);
        let params = AlternateKeyParams {
            code_hash: H256([9u8; 32]),
            hash_type: KeyHashType::Code,
        };
        let alt = ctx.derive_alternate_ownership_key(&params);
        assert_eq!(alt.code_hash, params.code_hash);
        assert_eq!(alt.args, ownership().args);
        // deterministic
        assert_eq!(alt, ctx.derive_alternate_ownership_key(&params));
    }
}
