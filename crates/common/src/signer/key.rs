use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::ledger::{OwnershipKey, SignedTransaction, TransactionSkeleton, WitnessEnvelope};

use super::context::{AlternateKeyParams, AuthorizationContext};
use super::{Connector, ConnectorKind, ConnectorState, ConnectorStatus, SignerError};

/// Size of a recoverable ECDSA signature: r (32) + s (32) + recovery byte
pub const RAW_SIGNATURE_SIZE: usize = 65;

/// The external raw-message signing collaborator.
///
/// Owns the actual key material and the signing prompt; this core only
/// sees the resulting recoverable signature.
#[async_trait]
pub trait RawMessageSigner: Send + Sync {
    /// The ownership key the connected key unlocks
    fn ownership_key(&self) -> OwnershipKey;

    /// Sign a 32-byte message, returning a 65-byte recoverable signature
    async fn sign_raw(&self, message: &[u8]) -> Result<Vec<u8>, anyhow::Error>;
}

/// Normalize a signature's trailing recovery byte in place.
///
/// Some signers emit the chain-era encoding where the recovery byte is
/// offset by 27; the packed authorization always encodes 0 or 1.
pub fn normalize_recovery_byte(signature: &mut [u8]) {
    if let Some(last) = signature.last_mut() {
        if *last >= 27 {
            *last -= 27;
        }
    }
}

/// Key-based ECDSA connector.
///
/// Signs the transaction's canonical message with the connected key and
/// packs the normalized signature into authorization slot 0. Single-slot
/// by design: this scheme does not support multi-input heterogeneous
/// authorization.
pub struct KeyConnector {
    signer: Arc<dyn RawMessageSigner>,
    state: Mutex<ConnectorState>,
}

impl KeyConnector {
    pub fn new(signer: Arc<dyn RawMessageSigner>) -> Self {
        Self {
            signer,
            state: ConnectorState::disconnected(),
        }
    }
}

#[async_trait]
impl Connector for KeyConnector {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Key
    }

    fn status(&self) -> ConnectorStatus {
        self.state.lock().status
    }

    async fn connect(&self) -> Result<AuthorizationContext, SignerError> {
        {
            let mut state = self.state.lock();
            if state.status != ConnectorStatus::Disconnected {
                return Err(SignerError::Busy(state.status));
            }
            state.status = ConnectorStatus::Connecting;
        }
        let context = AuthorizationContext::new(self.signer.ownership_key(), None);
        let mut state = self.state.lock();
        state.status = ConnectorStatus::Connected;
        state.context = Some(context.clone());
        tracing::debug!(address = %context.address, "key connector connected");
        Ok(context)
    }

    async fn disconnect(&self) -> Result<(), SignerError> {
        let mut state = self.state.lock();
        if state.status != ConnectorStatus::Connected {
            return Err(SignerError::NotConnected);
        }
        state.status = ConnectorStatus::Disconnected;
        state.context = None;
        Ok(())
    }

    fn derive_alternate_ownership_key(
        &self,
        params: &AlternateKeyParams,
    ) -> Result<OwnershipKey, SignerError> {
        let state = self.state.lock();
        let context = state.context.as_ref().ok_or(SignerError::NotConnected)?;
        Ok(context.derive_alternate_ownership_key(params))
    }

    async fn sign_transaction(
        &self,
        skeleton: TransactionSkeleton,
    ) -> Result<SignedTransaction, SignerError> {
        self.state.lock().begin_signing()?;
        let result = self.sign_inner(skeleton).await;
        self.state.lock().finish_signing();
        result
    }
}

impl KeyConnector {
    async fn sign_inner(
        &self,
        skeleton: TransactionSkeleton,
    ) -> Result<SignedTransaction, SignerError> {
        let message = skeleton.signing_message();
        let mut signature = self.signer.sign_raw(message.as_bytes()).await?;
        if signature.len() != RAW_SIGNATURE_SIZE {
            return Err(SignerError::MalformedSignature {
                expected: RAW_SIGNATURE_SIZE,
                got: signature.len(),
            });
        }
        normalize_recovery_byte(&mut signature);

        let witness = WitnessEnvelope::new(signature).to_wire();
        let signed = skeleton.set_witness(0, witness).into_signed()?;
        Ok(signed)
    }
}
