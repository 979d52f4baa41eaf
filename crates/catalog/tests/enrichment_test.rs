//! Chunked, paced detail enrichment
//!
//! Runs on a paused tokio clock, so elapsed time is exactly the sum of the
//! pacing delays and simulated latencies.

mod common;

use cinevault_catalog::{CatalogError, DetailEnricher, EnrichmentConfig, QuotaPolicy};
use common::{summaries, FakeProvider};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(100);

fn enricher(provider: Arc<FakeProvider>) -> DetailEnricher {
    DetailEnricher::new(provider, EnrichmentConfig::default())
}

fn range(n: u64) -> Vec<u64> {
    (1..=n).collect()
}

#[tokio::test(start_paused = true)]
async fn test_pacing_applied_between_chunks_only() {
    for n in [1u64, 4, 5, 6, 12, 20] {
        let provider = Arc::new(FakeProvider::new());
        let enricher = enricher(provider.clone());

        let start = Instant::now();
        let details = enricher
            .enrich_details(&summaries(&range(n)), 5, DELAY)
            .await
            .unwrap();

        let chunks = (n as u32 + 4) / 5;
        assert_eq!(details.len(), n as usize);
        assert_eq!(
            start.elapsed(),
            DELAY * (chunks - 1),
            "n = {} should pause {} times",
            n,
            chunks - 1
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_chunks_are_issued_in_order() {
    let provider = Arc::new(FakeProvider::new());
    let start = Instant::now();

    enricher(provider.clone())
        .enrich_details(&summaries(&range(12)), 5, DELAY)
        .await
        .unwrap();

    let calls = provider.detail_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 12);
    for (id, at) in calls {
        let chunk = (id - 1) / 5;
        assert_eq!(at - start, DELAY * chunk as u32, "id {} in chunk {}", id, chunk);
    }
}

#[tokio::test(start_paused = true)]
async fn test_fetches_within_a_chunk_run_concurrently() {
    let latency = Duration::from_millis(50);
    let provider = Arc::new(FakeProvider::new().with_detail_latency(latency));
    let start = Instant::now();

    let details = enricher(provider.clone())
        .enrich_details(&summaries(&range(12)), 5, DELAY)
        .await
        .unwrap();

    assert_eq!(details.len(), 12);
    assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 5);
    // three chunks of one round trip each, two pauses
    assert_eq!(start.elapsed(), latency * 3 + DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_items_are_dropped_in_order() {
    let provider = Arc::new(
        FakeProvider::new()
            .with_failing_details(&[2])
            .with_missing_details(&[9]),
    );

    let details = enricher(provider)
        .enrich_details(&summaries(&range(10)), 5, DELAY)
        .await
        .unwrap();

    let ids: Vec<_> = details.iter().map(|d| d.external_id).collect();
    assert_eq!(ids, vec![1, 3, 4, 5, 6, 7, 8, 10]);
}

#[tokio::test(start_paused = true)]
async fn test_quota_propagates_after_in_flight_chunk() {
    let provider = Arc::new(FakeProvider::new().with_quota_details(&[7]));

    let result = enricher(provider.clone())
        .enrich_details(&summaries(&range(12)), 5, DELAY)
        .await;

    assert!(matches!(result, Err(CatalogError::QuotaExceeded)));
    // the second chunk completes, the third is never issued
    assert_eq!(provider.detail_ids(), range(10));
}

#[tokio::test(start_paused = true)]
async fn test_quota_skipped_under_skip_policy() {
    let provider = Arc::new(FakeProvider::new().with_quota_details(&[7]));

    let details = enricher(provider.clone())
        .with_quota_policy(QuotaPolicy::Skip)
        .enrich_details(&summaries(&range(12)), 5, DELAY)
        .await
        .unwrap();

    assert_eq!(details.len(), 11);
    assert!(details.iter().all(|d| d.external_id != 7));
    assert_eq!(provider.detail_ids().len(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_zero_chunk_size_is_treated_as_one() {
    let provider = Arc::new(FakeProvider::new().with_detail_latency(Duration::from_millis(10)));
    let start = Instant::now();

    let details = enricher(provider.clone())
        .enrich_details(&summaries(&[4, 5, 6]), 0, DELAY)
        .await
        .unwrap();

    assert_eq!(details.len(), 3);
    assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::from_millis(10) * 3 + DELAY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_makes_no_calls() {
    let provider = Arc::new(FakeProvider::new());
    let start = Instant::now();

    let details = enricher(provider.clone())
        .enrich_details(&[], 5, DELAY)
        .await
        .unwrap();

    assert!(details.is_empty());
    assert!(provider.detail_ids().is_empty());
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_enrich_uses_configured_defaults() {
    let provider = Arc::new(FakeProvider::new());
    let start = Instant::now();

    let details = enricher(provider)
        .enrich(&summaries(&range(45)))
        .await
        .unwrap();

    assert_eq!(details.len(), 45);
    // 45 ids in chunks of 20 is three chunks
    assert_eq!(start.elapsed(), Duration::from_millis(200));
}
