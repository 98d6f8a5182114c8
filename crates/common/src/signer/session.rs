use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::ledger::{OwnershipKey, SignedTransaction, TransactionSkeleton, WitnessEnvelope, H256};

use super::context::{Address, AlternateKeyParams, AuthorizationContext, SessionKeyKind};
use super::{Connector, ConnectorKind, ConnectorState, ConnectorStatus, SignerError};
use super::SessionCredential;

/// The challenge/response signing collaborator.
///
/// Owns the server round trip: establishing a session credential on
/// connect, and obtaining a signature over a server-issued challenge
/// bound to the connected address on sign.
#[async_trait]
pub trait ChallengeSigner: Send + Sync {
    /// Run the interactive connect flow, yielding the connecting key's
    /// ownership key and a fresh session credential
    async fn establish(&self) -> Result<(OwnershipKey, SessionCredential), anyhow::Error>;

    /// Sign a challenge derived from `message`, tied to `address`
    async fn sign_challenge(
        &self,
        address: &Address,
        message: &H256,
    ) -> Result<Vec<u8>, anyhow::Error>;
}

/// External credential-validity predicate for delegated session keys
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn is_valid(&self, credential: &SessionCredential) -> Result<bool, anyhow::Error>;
}

/// Challenge/response session connector.
///
/// Refuses to sign under an expired or unauthorized session key rather
/// than letting the ledger reject the transaction later; expiry is
/// recoverable by reconnecting. The authorization slot is located by
/// matching the first input locked by the connecting key, not assumed to
/// be slot 0, and intermediate slots are backfilled with empty
/// placeholders to keep slot-to-input alignment.
pub struct SessionConnector {
    challenge_signer: Arc<dyn ChallengeSigner>,
    validator: Arc<dyn CredentialValidator>,
    /// session restored from persistence at startup, consumed by the
    /// first connect attempt without a user prompt
    stored: Mutex<Option<AuthorizationContext>>,
    state: Mutex<ConnectorState>,
}

impl SessionConnector {
    pub fn new(
        challenge_signer: Arc<dyn ChallengeSigner>,
        validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        Self {
            challenge_signer,
            validator,
            stored: Mutex::new(None),
            state: ConnectorState::disconnected(),
        }
    }

    /// Seed a previously persisted session, making the next `connect`
    /// an auto-reconnect attempt
    pub fn with_stored_session(self, context: AuthorizationContext) -> Self {
        *self.stored.lock() = Some(context);
        self
    }

    async fn check_credential(
        &self,
        credential: &SessionCredential,
    ) -> Result<(), SignerError> {
        match credential.kind {
            // the primary credential carries no delegation window
            SessionKeyKind::Primary => Ok(()),
            SessionKeyKind::Delegated => {
                let valid = self.validator.is_valid(credential).await?;
                if valid {
                    Ok(())
                } else {
                    Err(SignerError::SessionExpired)
                }
            }
        }
    }

    async fn sign_inner(
        &self,
        context: AuthorizationContext,
        skeleton: TransactionSkeleton,
    ) -> Result<SignedTransaction, SignerError> {
        // fail closed before any signing attempt
        let credential = context.session.ok_or(SignerError::SessionExpired)?;
        self.check_credential(&credential).await?;

        let message = skeleton.signing_message();
        let signature = self
            .challenge_signer
            .sign_challenge(&context.address, &message)
            .await?;

        let slot = skeleton
            .inputs()
            .iter()
            .position(|input| input.ownership == context.ownership)
            .ok_or(SignerError::NoMatchingInput)?;

        let witness = WitnessEnvelope::new(signature).to_wire();
        let signed = skeleton.set_witness(slot, witness).into_signed()?;
        Ok(signed)
    }
}

#[async_trait]
impl Connector for SessionConnector {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Session
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

        let restored = self.stored.lock().take();
        let result = match restored {
            // auto-reconnect: a stored session skips the interactive flow,
            // but its credential still has to pass the validity check
            Some(context) => match context.session {
                Some(credential) => self
                    .check_credential(&credential)
                    .await
                    .map(|()| context),
                None => Err(SignerError::SessionExpired),
            },
            None => self
                .challenge_signer
                .establish()
                .await
                .map_err(SignerError::from)
                .map(|(ownership, credential)| {
                    AuthorizationContext::new(ownership, Some(credential))
                }),
        };

        let mut state = self.state.lock();
        match result {
            Ok(context) => {
                state.status = ConnectorStatus::Connected;
                state.context = Some(context.clone());
                tracing::debug!(address = %context.address, "session connector connected");
                Ok(context)
            }
            Err(e) => {
                state.status = ConnectorStatus::Disconnected;
                state.context = None;
                Err(e)
            }
        }
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
        let context = self.state.lock().begin_signing()?;
        let result = self.sign_inner(context, skeleton).await;
        self.state.lock().finish_signing();
        result
    }
}
