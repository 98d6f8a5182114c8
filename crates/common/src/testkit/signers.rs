use async_trait::async_trait;
use rand::RngCore;

use crate::ledger::{OwnershipKey, H256};
use crate::signer::{
    Address, ChallengeSigner, CredentialValidator, RawMessageSigner, SessionCredential,
    RAW_SIGNATURE_SIZE,
};

/// Deterministic raw-message signer.
///
/// Emits blake3-derived bytes in place of a real ECDSA signature, with a
/// configurable trailing recovery byte so normalization can be asserted
/// against both the offset (27/28) and plain (0/1) encodings.
pub struct FixedKeySigner {
    ownership: OwnershipKey,
    recovery_byte: u8,
}

impl FixedKeySigner {
    pub fn new(ownership: OwnershipKey, recovery_byte: u8) -> Self {
        Self {
            ownership,
            recovery_byte,
        }
    }
}

#[async_trait]
impl RawMessageSigner for FixedKeySigner {
    fn ownership_key(&self) -> OwnershipKey {
        self.ownership.clone()
    }

    async fn sign_raw(&self, message: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        let half = blake3::hash(message);
        let mut signature = Vec::with_capacity(RAW_SIGNATURE_SIZE);
        signature.extend_from_slice(half.as_bytes());
        signature.extend_from_slice(blake3::hash(half.as_bytes()).as_bytes());
        signature.push(self.recovery_byte);
        Ok(signature)
    }
}

/// Deterministic challenge/response collaborator: hands out a fixed
/// credential on establish and signs challenges with blake3.
pub struct FixedChallengeSigner {
    ownership: OwnershipKey,
    credential: SessionCredential,
}

impl FixedChallengeSigner {
    pub fn new(ownership: OwnershipKey, credential: SessionCredential) -> Self {
        Self {
            ownership,
            credential,
        }
    }
}

#[async_trait]
impl ChallengeSigner for FixedChallengeSigner {
    async fn establish(&self) -> Result<(OwnershipKey, SessionCredential), anyhow::Error> {
        Ok((self.ownership.clone(), self.credential))
    }

    async fn sign_challenge(
        &self,
        address: &Address,
        message: &H256,
    ) -> Result<Vec<u8>, anyhow::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(address.0.as_bytes());
        hasher.update(message.as_bytes());
        Ok(hasher.finalize().as_bytes().to_vec())
    }
}

/// Credential validator against a fixed clock
pub struct FixedClockValidator {
    pub now: u64,
}

#[async_trait]
impl CredentialValidator for FixedClockValidator {
    async fn is_valid(&self, credential: &SessionCredential) -> Result<bool, anyhow::Error> {
        Ok(credential.expires_at > self.now)
    }
}

/// Random content buffer of the given length
pub fn random_content(len: usize) -> Vec<u8> {
    let mut content = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut content);
    content
}
