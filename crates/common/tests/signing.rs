//! Integration tests for the two connector schemes

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use ::common::ledger::{
    Bytes, KeyHashType, OutPoint, OwnershipKey, Record, TransactionSkeleton, WitnessEnvelope, H256,
};
use ::common::signer::{
    AlternateKeyParams, ChallengeSigner, Connector, ConnectorStatus, KeyConnector,
    RawMessageSigner, SessionConnector, SessionCredential, SignerError,
};
use ::common::testkit::{FixedChallengeSigner, FixedClockValidator, FixedKeySigner};

fn other_key() -> OwnershipKey {
    OwnershipKey::new(H256([0xee; 32]), KeyHashType::Data, vec![0x07; 20])
}

/// A funded-looking skeleton: one payer input, one output
fn skeleton_with_inputs(locks: &[OwnershipKey]) -> TransactionSkeleton {
    let record = Record {
        capacity: 500,
        ownership: other_key(),
        kind: None,
    };
    let mut skeleton = TransactionSkeleton::new().output(record, Bytes::from_static(b"out"));
    for (i, lock) in locks.iter().enumerate() {
        skeleton = skeleton.input(OutPoint::new(H256([i as u8; 32]), 0), lock.clone());
    }
    skeleton
}

fn unpack_authorization(witness: &[u8]) -> Vec<u8> {
    WitnessEnvelope::from_wire(witness)
        .unwrap()
        .authorization
        .expect("slot should carry a signature")
}

async fn connected_key_connector(recovery_byte: u8) -> KeyConnector {
    let connector = KeyConnector::new(Arc::new(FixedKeySigner::new(
        common::payer_key(),
        recovery_byte,
    )));
    connector.connect().await.unwrap();
    connector
}

async fn connected_session_connector(
    credential: SessionCredential,
    now: u64,
) -> SessionConnector {
    let connector = SessionConnector::new(
        Arc::new(FixedChallengeSigner::new(common::payer_key(), credential)),
        Arc::new(FixedClockValidator { now }),
    );
    connector.connect().await.unwrap();
    connector
}

#[tokio::test]
async fn test_recovery_byte_normalization() {
    for (raw, normalized) in [(27u8, 0u8), (28, 1)] {
        let connector = connected_key_connector(raw).await;
        let signed = connector
            .sign_transaction(skeleton_with_inputs(&[common::payer_key()]))
            .await
            .unwrap();

        let authorization = unpack_authorization(&signed.skeleton().witnesses()[0]);
        assert_eq!(authorization.len(), 65);
        assert_eq!(*authorization.last().unwrap(), normalized);
    }
}

#[tokio::test]
async fn test_key_connector_packs_slot_zero_only() {
    let connector = connected_key_connector(27).await;
    let signed = connector
        .sign_transaction(skeleton_with_inputs(&[other_key(), common::payer_key()]))
        .await
        .unwrap();

    // key scheme always authorizes slot 0, regardless of input locks
    assert_eq!(signed.skeleton().witnesses().len(), 1);
    let _ = unpack_authorization(&signed.skeleton().witnesses()[0]);
}

#[tokio::test]
async fn test_key_connector_rejects_malformed_signature() {
    struct TruncatingSigner;

    #[async_trait]
    impl RawMessageSigner for TruncatingSigner {
        fn ownership_key(&self) -> OwnershipKey {
            common::payer_key()
        }
        async fn sign_raw(&self, _message: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
            Ok(vec![0u8; 64])
        }
    }

    let connector = KeyConnector::new(Arc::new(TruncatingSigner));
    connector.connect().await.unwrap();
    let result = connector
        .sign_transaction(skeleton_with_inputs(&[common::payer_key()]))
        .await;
    assert!(matches!(
        result,
        Err(SignerError::MalformedSignature {
            expected: 65,
            got: 64
        })
    ));
}

#[tokio::test]
async fn test_signing_requires_connection() {
    let connector = KeyConnector::new(Arc::new(FixedKeySigner::new(common::payer_key(), 27)));
    let result = connector
        .sign_transaction(skeleton_with_inputs(&[common::payer_key()]))
        .await;
    assert!(matches!(result, Err(SignerError::NotConnected)));
}

#[tokio::test]
async fn test_connect_disconnect_state_machine() {
    let connector = KeyConnector::new(Arc::new(FixedKeySigner::new(common::payer_key(), 27)));
    assert_eq!(connector.status(), ConnectorStatus::Disconnected);

    connector.connect().await.unwrap();
    assert_eq!(connector.status(), ConnectorStatus::Connected);

    // connecting twice is a state error
    assert!(matches!(
        connector.connect().await,
        Err(SignerError::Busy(ConnectorStatus::Connected))
    ));

    connector.disconnect().await.unwrap();
    assert_eq!(connector.status(), ConnectorStatus::Disconnected);
    assert!(matches!(
        connector.disconnect().await,
        Err(SignerError::NotConnected)
    ));
}

#[tokio::test]
async fn test_session_slot_located_by_ownership_with_backfill() {
    let connector = connected_session_connector(common::delegated_credential(1_000), 10).await;

    // the connecting key locks the third input, not slot 0
    let skeleton =
        skeleton_with_inputs(&[other_key(), other_key(), common::payer_key()]);
    let signed = connector.sign_transaction(skeleton).await.unwrap();

    let witnesses = signed.skeleton().witnesses();
    assert_eq!(witnesses.len(), 3);
    // intermediate slots are empty placeholders keeping alignment
    for witness in &witnesses[..2] {
        let envelope = WitnessEnvelope::from_wire(witness).unwrap();
        assert_eq!(envelope.authorization, None);
    }
    let _ = unpack_authorization(&witnesses[2]);
}

#[tokio::test]
async fn test_session_no_matching_input_is_an_error() {
    let connector = connected_session_connector(common::delegated_credential(1_000), 10).await;
    let result = connector
        .sign_transaction(skeleton_with_inputs(&[other_key()]))
        .await;
    assert!(matches!(result, Err(SignerError::NoMatchingInput)));
}

#[tokio::test]
async fn test_expired_session_fails_closed() {
    // validity window ended before "now"
    let connector = connected_session_connector(common::delegated_credential(50), 100).await;
    let result = connector
        .sign_transaction(skeleton_with_inputs(&[common::payer_key()]))
        .await;
    assert!(matches!(result, Err(SignerError::SessionExpired)));
    // recoverable: the connector stays connected so the caller can
    // disconnect and reconnect
    assert_eq!(connector.status(), ConnectorStatus::Connected);
}

#[tokio::test]
async fn test_stored_session_auto_reconnects() {
    use ::common::signer::AuthorizationContext;

    let stored =
        AuthorizationContext::new(common::payer_key(), Some(common::delegated_credential(1_000)));
    let connector = SessionConnector::new(
        Arc::new(FixedChallengeSigner::new(
            other_key(),
            common::delegated_credential(1_000),
        )),
        Arc::new(FixedClockValidator { now: 10 }),
    )
    .with_stored_session(stored.clone());

    // the stored identity wins over the interactive flow's
    let context = connector.connect().await.unwrap();
    assert_eq!(context.address, stored.address);
}

#[tokio::test]
async fn test_stored_expired_session_fails_reconnect() {
    use ::common::signer::AuthorizationContext;

    let stored =
        AuthorizationContext::new(common::payer_key(), Some(common::delegated_credential(50)));
    let connector = SessionConnector::new(
        Arc::new(FixedChallengeSigner::new(
            common::payer_key(),
            common::delegated_credential(1_000),
        )),
        Arc::new(FixedClockValidator { now: 100 }),
    )
    .with_stored_session(stored);

    assert!(matches!(
        connector.connect().await,
        Err(SignerError::SessionExpired)
    ));
    assert_eq!(connector.status(), ConnectorStatus::Disconnected);
}

#[tokio::test]
async fn test_derive_alternate_ownership_key() {
    let connector = connected_key_connector(27).await;
    let params = AlternateKeyParams {
        code_hash: H256([0x99; 32]),
        hash_type: KeyHashType::Code,
    };
    let alt = connector.derive_alternate_ownership_key(&params).unwrap();
    assert_eq!(alt.code_hash, params.code_hash);
    assert_eq!(alt.args, common::payer_key().args);
}
