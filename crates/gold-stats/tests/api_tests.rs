//! API integration tests

mod common;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::MockChain;
use gold_stats::api::{create_router, ApiState};
use gold_stats::core::{DistributionLogSource, DistributionStore, StatsError, StatsResult};
use gold_stats::store::{DistributionLogEntry, DistributionRecord, HolderSnapshot, ProtocolSettings};
use gold_stats::testing::ManualClock;
use gold_stats::{MemoryStore, StatsConfig, StatsService};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

const SEED: &str = r#"{
    "distributions": [
        {
            "id": "6f1c1f5e-7b7a-4a43-9d6e-1f8f3b0f2a11",
            "timestamp": "2025-03-01T00:00:00Z",
            "totalFeesCollected": "1",
            "feesForGold": "0.7",
            "feesForBurn": "0.3",
            "goldPurchased": "0.1",
            "holdersCount": 4,
            "status": "completed"
        },
        {
            "id": "0b8d5f2e-3c1a-4f7e-8a9b-2c4d6e8f0a22",
            "timestamp": "2025-03-02T00:00:00Z",
            "totalFeesCollected": "1",
            "feesForGold": "0.7",
            "feesForBurn": "0.3",
            "goldPurchased": "0.1",
            "holdersCount": 4,
            "status": "failed"
        },
        {
            "id": "9c2e4a6b-8d0f-4b1a-9c3e-5f7a9b1c3d33",
            "timestamp": "2025-03-03T00:00:00Z",
            "totalFeesCollected": "1",
            "feesForGold": "0.7",
            "feesForBurn": "0.3",
            "goldPurchased": "0.1",
            "holdersCount": 4,
            "status": "pending"
        }
    ],
    "holders": [
        {
            "id": "a3e1d2c4-5b6a-4c7d-8e9f-0a1b2c3d4e55",
            "distributionId": "6f1c1f5e-7b7a-4a43-9d6e-1f8f3b0f2a11",
            "walletAddress": "Wallet1111111111111111111111111111111111111",
            "tokenBalance": "1000",
            "percentageOfSupply": "1.2",
            "status": "completed"
        }
    ],
    "logs": [
        { "id": "log-1", "transaction": "5xSigOlder", "goldDistributed": 0.4, "date": "2025-03-01T10:00:00Z" },
        { "id": "log-2", "transaction": "5xSigNewer", "goldDistributed": 1.5, "date": "2025-03-04T10:00:00Z" }
    ]
}"#;

/// Create a test API with an optional seeded store
fn create_test_api(mint: Option<&str>, seeded: bool) -> Router {
    let mut config = StatsConfig::default();
    config.tracking.token_mint = mint.map(str::to_string);

    let seeded = seeded.then(|| Arc::new(MemoryStore::from_json(SEED).unwrap()));
    let store = seeded.clone().map(|s| s as Arc<dyn DistributionStore>);
    let stats = StatsService::new(
        Arc::new(MockChain::new()),
        store,
        Arc::new(ManualClock::new()),
        &config,
    );

    let mut state = ApiState::new(Arc::new(stats));
    if let Some(seeded) = seeded {
        state = state.with_logs(seeded);
    }
    create_router(state)
}

/// Store and log source whose every read fails
#[derive(Default)]
struct BrokenStore {
    reads: AtomicUsize,
}

impl BrokenStore {
    fn fail<T>(&self) -> StatsResult<T> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(StatsError::Store("connection refused".into()))
    }
}

#[async_trait]
impl DistributionStore for BrokenStore {
    async fn recent_distributions(&self, _limit: usize) -> StatsResult<Vec<DistributionRecord>> {
        self.fail()
    }

    async fn distribution(&self, _id: &Uuid) -> StatsResult<Option<DistributionRecord>> {
        self.fail()
    }

    async fn holder_snapshots(&self, _distribution_id: &Uuid) -> StatsResult<Vec<HolderSnapshot>> {
        self.fail()
    }

    async fn protocol_settings(&self) -> StatsResult<Option<ProtocolSettings>> {
        self.fail()
    }
}

#[async_trait]
impl DistributionLogSource for BrokenStore {
    async fn recent_logs(&self, _limit: usize) -> StatsResult<Vec<DistributionLogEntry>> {
        self.fail()
    }
}

fn create_broken_api(store: Arc<BrokenStore>) -> Router {
    let mut config = StatsConfig::default();
    config.tracking.token_mint = Some(Pubkey::new_unique().to_string());

    let stats = StatsService::new(
        Arc::new(MockChain::new()),
        Some(store.clone()),
        Arc::new(ManualClock::new()),
        &config,
    );
    create_router(ApiState::new(Arc::new(stats)).with_logs(store))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_stats_for_undeployed_mint() {
    let mint = Pubkey::new_unique().to_string();
    let (status, body) = get(create_test_api(Some(&mint), false), "/api/public/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalProtocolFees"], 0.0);
    assert_eq!(body["feesConvertedToGold"], 0.0);
    assert_eq!(body["tokenMint"], mint.as_str());
    assert_eq!(body["burnPercentage"], "30");
    assert!(body["lastDistribution"].is_null());
}

#[tokio::test]
async fn test_stats_with_store() {
    let (status, body) = get(create_test_api(None, true), "/api/public/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDistributions"], 1);
    assert_eq!(body["totalBurned"], 0.9);
    assert!(body["tokenMint"].is_null());
}

#[tokio::test]
async fn test_stats_store_failure_is_500_and_recomputed() {
    let store = Arc::new(BrokenStore::default());
    let app = create_broken_api(store.clone());

    let (status, body) = get(app.clone(), "/api/public/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch stats" }));
    assert!(body.get("totalProtocolFees").is_none());
    let reads_after_first = store.reads.load(Ordering::SeqCst);
    assert!(reads_after_first > 0);

    let (status, body) = get(app, "/api/public/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch stats");
    assert!(store.reads.load(Ordering::SeqCst) > reads_after_first);
}

#[tokio::test]
async fn test_distribution_logs_newest_first() {
    let (status, body) = get(create_test_api(None, true), "/api/public/distribution-logs").await;

    assert_eq!(status, StatusCode::OK);
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["id"], "log-2");
    assert_eq!(logs[0]["transaction"], "5xSigNewer");
    assert_eq!(logs[0]["goldDistributed"], 1.5);
    assert_eq!(logs[0]["date"], "2025-03-04T10:00:00Z");
    assert_eq!(logs[1]["id"], "log-1");
}

#[tokio::test]
async fn test_distribution_logs_without_source_are_empty() {
    let (status, body) = get(create_test_api(None, false), "/api/public/distribution-logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_distribution_logs_failure_is_500() {
    let (status, body) = get(
        create_broken_api(Arc::new(BrokenStore::default())),
        "/api/public/distribution-logs",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch distribution logs" }));
}

#[tokio::test]
async fn test_public_config() {
    let (status, body) = get(create_test_api(Some("SomeMint"), false), "/api/public/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ca"], "SomeMint");

    let (_, body) = get(create_test_api(None, false), "/api/public/config").await;
    assert!(body["ca"].is_null());
}

#[tokio::test]
async fn test_distributions_without_store_are_empty() {
    let (status, body) = get(create_test_api(None, false), "/api/public/distributions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_distributions_hide_failed_and_respect_limit() {
    let (_, body) = get(create_test_api(None, true), "/api/public/distributions").await;
    let statuses: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["pending", "completed"]);

    let (_, body) = get(create_test_api(None, true), "/api/public/distributions?limit=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = get(create_test_api(None, true), "/api/public/distributions?limit=abc").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_distribution_detail() {
    let (status, body) = get(
        create_test_api(None, true),
        "/api/public/distributions/6f1c1f5e-7b7a-4a43-9d6e-1f8f3b0f2a11",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distribution"]["holdersCount"], 4);
    assert_eq!(body["holders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_distribution_not_found() {
    for (seeded, id) in [
        (true, "00000000-0000-4000-8000-000000000000"),
        (true, "not-a-uuid"),
        (false, "6f1c1f5e-7b7a-4a43-9d6e-1f8f3b0f2a11"),
    ] {
        let (status, body) =
            get(create_test_api(None, seeded), &format!("/api/public/distributions/{}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Distribution not found");
    }
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(create_test_api(None, false), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
