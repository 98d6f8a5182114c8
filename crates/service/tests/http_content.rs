//! Integration tests for the content-serving HTTP surface

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use tower::util::ServiceExt;

use common::ledger::{Bytes, KeyHashType, OwnershipKey, PrimaryData, Record, H256};
use common::segment::{build_segment_skeleton, encode_segments};
use common::testkit::MemoryLedger;
use service::{Config, ServiceState};

fn primary_kind() -> OwnershipKey {
    OwnershipKey::new(H256([0x42; 32]), KeyHashType::Code, vec![0x10; 32])
}

fn setup(ledger: Arc<MemoryLedger>) -> Router {
    let state = ServiceState::from_config(&Config::default(), ledger).unwrap();
    Router::new()
        .route("/content/:id", get(service::http::content::handler))
        .with_state(state)
}

fn insert_primary(ledger: &MemoryLedger, data: &PrimaryData) -> H256 {
    let record = Record {
        capacity: 0,
        ownership: OwnershipKey::new(H256([0x41; 32]), KeyHashType::Data, vec![]),
        kind: Some(primary_kind()),
    };
    ledger.insert(record, Bytes::from(data.to_wire().unwrap()));
    primary_kind().hash()
}

fn insert_segments(ledger: &MemoryLedger, content: &[u8], chunk_size: usize) {
    let proto = Config::default().protocol();
    for segment in encode_segments(content, chunk_size).unwrap() {
        let skeleton = build_segment_skeleton(&primary_kind(), &segment, &proto);
        let (record, data) = skeleton.outputs()[0].clone();
        ledger.insert(record, data);
    }
}

async fn get_content(router: Router, id: &str) -> (StatusCode, Option<String>, Option<String>, Vec<u8>) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("/content/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, cache_control, body.to_vec())
}

#[tokio::test]
async fn test_serves_segmented_content_with_immutable_caching() {
    let ledger = Arc::new(MemoryLedger::new());
    let payload: Vec<u8> = (0..=255u8).cycle().take(30_000).collect();
    let id = insert_primary(&ledger, &PrimaryData::segmented("application/pdf"));
    insert_segments(&ledger, &payload, 10_240);

    let (status, content_type, cache_control, body) =
        get_content(setup(ledger), &id.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert_eq!(
        cache_control.as_deref(),
        Some("public, max-age=31536000, immutable")
    );
    assert_eq!(body, payload);
}

#[tokio::test]
async fn test_serves_inline_content() {
    let ledger = Arc::new(MemoryLedger::new());
    let id = insert_primary(
        &ledger,
        &PrimaryData::inline("text/plain", b"small enough".to_vec()),
    );

    let (status, content_type, _, body) = get_content(setup(ledger), &id.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(body, b"small enough");
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let ledger = Arc::new(MemoryLedger::new());
    let id = H256([0x99; 32]).to_string();
    let (status, _, _, _) = get_content(setup(ledger), &id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_segments_map_to_404() {
    let ledger = Arc::new(MemoryLedger::new());
    // segmented primary with no segment records on the ledger
    let id = insert_primary(&ledger, &PrimaryData::segmented("video/mp4"));

    let (status, _, _, _) = get_content(setup(ledger), &id.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let ledger = Arc::new(MemoryLedger::new());
    let (status, _, _, _) = get_content(setup(ledger), "not-a-hash").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
