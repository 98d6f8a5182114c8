mod context;
mod key;
mod session;

pub use context::{Address, AlternateKeyParams, AuthorizationContext, SessionCredential, SessionKeyKind};
pub use key::{normalize_recovery_byte, KeyConnector, RawMessageSigner, RAW_SIGNATURE_SIZE};
pub use session::{ChallengeSigner, CredentialValidator, SessionConnector};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::ledger::{OwnershipKey, SignedTransaction, SkeletonError, TransactionSkeleton};

/// The closed set of transaction-authorization schemes.
///
/// Dispatch happens on this stored tag, never on runtime type
/// inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorKind {
    /// key-based ECDSA signing over the transaction message
    Key,
    /// challenge/response signing under a short-lived session key
    Session,
}

/// Per-connector lifecycle state
///
/// `Disconnected → Connecting → Connected → Signing → Connected`, with
/// `Connected → Disconnected` on explicit disconnect. An auto-reconnect
/// from a stored session is the same `Disconnected → Connecting`
/// transition, just without user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorStatus {
    Disconnected,
    Connecting,
    Connected,
    Signing,
}

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("no connector registered for stored kind {0:?}")]
    NoConnector(ConnectorKind),
    #[error("no connector kind stored")]
    NoStoredKind,
    #[error("connector is not connected")]
    NotConnected,
    #[error("connector is busy: {0:?}")]
    Busy(ConnectorStatus),
    #[error("session credential expired or invalid, reconnect required")]
    SessionExpired,
    #[error("malformed signature: expected {expected} bytes, got {got}")]
    MalformedSignature { expected: usize, got: usize },
    #[error("no transaction input is locked by the connecting key")]
    NoMatchingInput,
    #[error("skeleton error: {0}")]
    Skeleton(#[from] SkeletonError),
    #[error("external signer error: {0}")]
    External(#[from] anyhow::Error),
}

/// The capability set every authorization scheme provides
#[async_trait]
pub trait Connector: Send + Sync {
    fn kind(&self) -> ConnectorKind;

    fn status(&self) -> ConnectorStatus;

    /// Establish a session, returning the authorization context now
    /// owned by this connector
    async fn connect(&self) -> Result<AuthorizationContext, SignerError>;

    /// Tear the session down. Only valid from `Connected`.
    async fn disconnect(&self) -> Result<(), SignerError>;

    /// Derive an alternate ownership key for the connected identity
    fn derive_alternate_ownership_key(
        &self,
        params: &AlternateKeyParams,
    ) -> Result<OwnershipKey, SignerError>;

    /// Authorize a funded skeleton, producing a signed transaction
    async fn sign_transaction(
        &self,
        skeleton: TransactionSkeleton,
    ) -> Result<SignedTransaction, SignerError>;
}

/// Dispatches signer calls to the connector registered for the stored
/// connector kind.
pub struct SignerRegistry {
    connectors: HashMap<ConnectorKind, Arc<dyn Connector>>,
    stored_kind: Mutex<Option<ConnectorKind>>,
}

impl SignerRegistry {
    pub fn new() -> Self {
        Self {
            connectors: HashMap::new(),
            stored_kind: Mutex::new(None),
        }
    }

    pub fn register(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connectors.insert(connector.kind(), connector);
        self
    }

    /// Record which scheme subsequent calls dispatch to
    pub fn set_stored_kind(&self, kind: ConnectorKind) {
        *self.stored_kind.lock() = Some(kind);
    }

    pub fn stored_kind(&self) -> Option<ConnectorKind> {
        *self.stored_kind.lock()
    }

    /// The connector for the stored kind.
    ///
    /// A missing connector here is a programming/state error, fatal to
    /// the caller.
    pub fn active(&self) -> Result<Arc<dyn Connector>, SignerError> {
        let kind = self.stored_kind().ok_or(SignerError::NoStoredKind)?;
        self.connectors
            .get(&kind)
            .cloned()
            .ok_or(SignerError::NoConnector(kind))
    }

    pub async fn connect(&self) -> Result<AuthorizationContext, SignerError> {
        self.active()?.connect().await
    }

    pub async fn disconnect(&self) -> Result<(), SignerError> {
        self.active()?.disconnect().await
    }

    pub async fn sign_transaction(
        &self,
        skeleton: TransactionSkeleton,
    ) -> Result<SignedTransaction, SignerError> {
        self.active()?.sign_transaction(skeleton).await
    }
}

impl Default for SignerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared status cell used by both connector implementations
pub(crate) struct ConnectorState {
    pub status: ConnectorStatus,
    pub context: Option<AuthorizationContext>,
}

impl ConnectorState {
    pub(crate) fn disconnected() -> Mutex<Self> {
        Mutex::new(Self {
            status: ConnectorStatus::Disconnected,
            context: None,
        })
    }

    /// Move from `Connected` into `Signing`, handing back the context
    pub(crate) fn begin_signing(&mut self) -> Result<AuthorizationContext, SignerError> {
        match self.status {
            ConnectorStatus::Connected => {
                self.status = ConnectorStatus::Signing;
                // context is always present once connected
                self.context.clone().ok_or(SignerError::NotConnected)
            }
            ConnectorStatus::Disconnected | ConnectorStatus::Connecting => {
                Err(SignerError::NotConnected)
            }
            ConnectorStatus::Signing => Err(SignerError::Busy(self.status)),
        }
    }

    pub(crate) fn finish_signing(&mut self) {
        if self.status == ConnectorStatus::Signing {
            self.status = ConnectorStatus::Connected;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_registry_requires_stored_kind() {
        let registry = SignerRegistry::new();
        assert!(matches!(registry.active(), Err(SignerError::NoStoredKind)));
    }

    #[test]
    fn test_registry_missing_connector_is_fatal() {
        let registry = SignerRegistry::new();
        registry.set_stored_kind(ConnectorKind::Session);
        assert!(matches!(
            registry.active(),
            Err(SignerError::NoConnector(ConnectorKind::Session))
        ));
    }
}
