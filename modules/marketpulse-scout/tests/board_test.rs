//! Refresh controller behaviour against mock producers.

use std::time::Duration;

use marketpulse_common::{GroundingChunk, RawModelResponse};
use marketpulse_scout::board::REFRESH_FAILED_MESSAGE;
use marketpulse_scout::testing::{chatty_response, MockSource, FULL_REPORT};
use marketpulse_scout::{AppStatus, PulseBoard};

fn report_source() -> MockSource {
    MockSource::new(chatty_response(
        FULL_REPORT,
        vec![GroundingChunk::web("https://news.com/makita-ai", "Makita bets on AI")],
    ))
}

#[tokio::test]
async fn successful_refresh_stores_normalized_data() {
    let board = PulseBoard::new();
    let source = report_source();

    let status = board.refresh(&source).await;

    assert_eq!(status, AppStatus::Success);
    assert_eq!(source.calls(), 1);
    let snap = board.snapshot().await;
    assert!(snap.error.is_none());
    assert!(snap.last_updated.is_some());
    let data = snap.data.unwrap();
    assert_eq!(data.moves.len(), 4);
    assert_eq!(data.moves[1].link, "https://news.com/makita-ai");
}

#[tokio::test]
async fn producer_failure_sets_user_facing_error() {
    let board = PulseBoard::new();
    let source = MockSource::failing("connection reset");

    let status = board.refresh(&source).await;

    assert_eq!(status, AppStatus::Error);
    assert_eq!(board.error().await.as_deref(), Some(REFRESH_FAILED_MESSAGE));
    assert!(board.data().await.is_none());
}

#[tokio::test]
async fn unparseable_response_is_still_a_success() {
    let board = PulseBoard::new();
    let source = MockSource::new(RawModelResponse::new("no json today", Vec::new()));

    assert_eq!(board.refresh(&source).await, AppStatus::Success);
    assert!(board.data().await.unwrap().is_empty());
}

#[tokio::test]
async fn superseded_refresh_result_is_discarded() {
    let board = PulseBoard::new();
    let slow = MockSource::failing("stale run").with_delay(Duration::from_millis(200));
    let fast = report_source();

    let (_, latest) = tokio::join!(board.refresh(&slow), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        board.refresh(&fast).await
    });

    assert_eq!(latest, AppStatus::Success);
    assert_eq!(slow.calls(), 1);
    assert_eq!(fast.calls(), 1);

    // The slow failure finished last but belonged to an older refresh.
    assert_eq!(board.status().await, AppStatus::Success);
    assert!(board.error().await.is_none());
    assert_eq!(board.data().await.unwrap().moves.len(), 4);
}

#[tokio::test]
async fn new_refresh_clears_previous_error() {
    let board = PulseBoard::new();
    board.refresh(&MockSource::failing("down")).await;
    assert_eq!(board.status().await, AppStatus::Error);

    board.begin_refresh().await;
    assert_eq!(board.status().await, AppStatus::Loading);
    assert!(board.error().await.is_none());
}
