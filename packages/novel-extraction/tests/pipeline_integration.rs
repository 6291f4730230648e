//! Integration tests for the extraction run.
//!
//! These tests drive the full per-segment loop:
//! 1. Chunk the document
//! 2. Carry known-entity context between segments
//! 3. Call the (mock) service with retry and pacing
//! 4. Merge candidates into canonical records
//! 5. Record debug entries and honor cancellation

use std::sync::{Arc, Mutex};

use novel_extraction::testing::MockExtractor;
use novel_extraction::{
    ExtractionError, ExtractionRun, ModelProfile, PipelineConfig, RetryConfig, RunOptions,
    RunStatus,
};
use tokio_util::sync::CancellationToken;

/// A config with tiny segments, no pacing and fast retries.
fn test_config(max_chunk_chars: usize) -> PipelineConfig {
    PipelineConfig::new(ModelProfile::new("mock-model", max_chunk_chars, 0)).with_retry(
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 5,
            jitter_ms: 2,
        },
    )
}

fn payload(json: &str) -> String {
    json.to_string()
}

#[tokio::test]
async fn test_single_segment_run_extracts_entities() {
    let client = MockExtractor::new().with_payload(payload(
        r#"{
            "characters": [
                {"group_name": "唐僧", "name": "三藏", "aliases": ["大唐和尚"], "role": "primary"}
            ],
            "scenes": [
                {"group_name": "长安", "name": "皇宫", "structure": "interior", "kind": "plot-point"}
            ]
        }"#,
    ));
    let run = ExtractionRun::with_config(client, test_config(1_000));

    let outcome = run.run("却说三藏辞别了驾。", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.characters.len(), 1);
    assert_eq!(outcome.characters[0].group_name, "唐僧");
    assert!(outcome.characters[0].aliases.contains("大唐和尚"));
    assert_eq!(outcome.scenes.len(), 1);
    assert_eq!(outcome.scenes[0].frequency, 1);
}

#[tokio::test]
async fn test_entities_merge_across_segments() {
    // Two segments report the same character under variant spellings and
    // the same scene twice.
    let client = MockExtractor::new()
        .with_payload(payload(
            r#"{
                "characters": [{"group_name": "唐僧", "name": "三藏", "aliases": ["唐僧"]}],
                "scenes": [{"group_name": "花果山", "name": "水帘洞"}]
            }"#,
        ))
        .with_payload(payload(
            r#"{
                "characters": [{"group_name": "唐 僧", "name": "三藏", "aliases": ["大唐和尚"]}],
                "scenes": [{"group_name": "花果山", "name": "水帘洞", "frequency": 3}]
            }"#,
        ));
    // Segment size 4 chars over an 8-char document yields two segments.
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("前四个字后四个字", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.characters.len(), 1, "variant spellings must merge");
    let merged = &outcome.characters[0];
    assert!(merged.aliases.contains("唐僧"));
    assert!(merged.aliases.contains("大唐和尚"));

    assert_eq!(outcome.scenes.len(), 1);
    assert_eq!(outcome.scenes[0].frequency, 4);
}

#[tokio::test]
async fn test_context_carried_into_later_segments() {
    let client = MockExtractor::new()
        .with_payload(payload(
            r#"{"characters": [{"group_name": "唐僧", "name": "三藏"}], "scenes": []}"#,
        ))
        .with_payload(payload(r#"{"characters": [], "scenes": []}"#));
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("前四个字后四个字", RunOptions::new()).await.unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);

    // First call sees no context; the second reflects the first merge.
    let calls = run.client().calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].context.is_empty());
    assert!(calls[1].context.contains("唐僧 / 三藏"));
}

#[tokio::test]
async fn test_failed_segment_skipped_not_fatal() {
    let client = MockExtractor::new()
        .with_error("server exploded")
        .with_payload(payload(
            r#"{"characters": [{"group_name": "悟空", "name": "行者"}], "scenes": []}"#,
        ));
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("前四个字后四个字", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.characters.len(), 1, "second segment still processed");
    assert_eq!(outcome.debug_log.len(), 2);
    assert!(outcome.debug_log[0].error.is_some());
    assert!(outcome.debug_log[0].raw_response.is_empty());
    assert!(outcome.debug_log[1].error.is_none());
}

#[tokio::test]
async fn test_rate_limit_retried_then_recovers() {
    let client = MockExtractor::new()
        .with_rate_limit()
        .with_payload(payload(
            r#"{"characters": [{"group_name": "悟空", "name": "行者"}], "scenes": []}"#,
        ));
    let run = ExtractionRun::with_config(client, test_config(1_000));

    let outcome = run.run("一段短文。", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.characters.len(), 1);
    // One segment, two calls: the rate-limited attempt plus the retry.
    assert_eq!(run.client().call_count(), 2);
    // One debug entry per segment attempt, not per retry.
    assert_eq!(outcome.debug_log.len(), 1);
}

#[tokio::test]
async fn test_retry_exhaustion_logged_and_skipped() {
    // max_retries = 2 means 3 calls per segment before giving up.
    let client = MockExtractor::new()
        .with_rate_limit()
        .with_rate_limit()
        .with_rate_limit()
        .with_payload(payload(
            r#"{"characters": [{"group_name": "悟空", "name": "行者"}], "scenes": []}"#,
        ));
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("前四个字后四个字", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.debug_log.len(), 2);
    let failed = &outcome.debug_log[0];
    assert!(failed.error.as_deref().unwrap_or_default().contains("retries exhausted"));
    assert!(failed.parsed.is_none());
    // The second segment recovered.
    assert_eq!(outcome.characters.len(), 1);
}

#[tokio::test]
async fn test_undecodable_response_logged_with_raw_body() {
    let client = MockExtractor::new().with_payload("not json at all");
    let run = ExtractionRun::with_config(client, test_config(1_000));

    let outcome = run.run("一段短文。", RunOptions::new()).await.unwrap();

    assert!(outcome.characters.is_empty());
    let entry = &outcome.debug_log[0];
    assert_eq!(entry.raw_response, "not json at all");
    assert!(entry.parsed.is_none());
    assert!(entry.error.is_some());
}

#[tokio::test]
async fn test_prompt_recorded_for_first_segment_only() {
    let client = MockExtractor::new();
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("前四个字后四个字", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.debug_log.len(), 2);
    assert!(outcome.debug_log[0].prompt_used.is_some());
    assert!(outcome.debug_log[1].prompt_used.is_none());
}

#[tokio::test]
async fn test_cancellation_returns_partial_results() {
    let cancel = CancellationToken::new();
    let client = MockExtractor::new()
        .cancel_after(2, cancel.clone())
        .with_payload(payload(
            r#"{"characters": [{"group_name": "唐僧", "name": "三藏"}], "scenes": []}"#,
        ))
        .with_payload(payload(
            r#"{"characters": [{"group_name": "悟空", "name": "行者"}], "scenes": []}"#,
        ))
        .with_payload(payload(
            r#"{"characters": [{"group_name": "八戒", "name": "悟能"}], "scenes": []}"#,
        ));
    // Four segments; cancellation fires right after the second call.
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run
        .run(
            "一二三四五六七八九十眼下十六个字",
            RunOptions::new().with_cancel(cancel),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Cancelled);
    // Only the first two segments contributed.
    assert_eq!(outcome.characters.len(), 2);
    assert_eq!(run.client().call_count(), 2, "no calls after cancellation");
}

#[tokio::test]
async fn test_pre_cancelled_run_issues_no_calls() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = MockExtractor::new();
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run
        .run("前四个字后四个字", RunOptions::new().with_cancel(cancel))
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert!(outcome.characters.is_empty());
    assert_eq!(run.client().call_count(), 0);
}

#[tokio::test]
async fn test_progress_reported_before_each_segment() {
    let reports: Arc<Mutex<Vec<(u8, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let reports2 = Arc::clone(&reports);

    let client = MockExtractor::new();
    let run = ExtractionRun::with_config(client, test_config(4));

    let progress = move |percent: u8, status: &str| {
        reports2.lock().unwrap().push((percent, status.to_string()));
    };

    run.run(
        "前四个字后四个字",
        RunOptions::new().with_progress(Arc::new(progress)),
    )
    .await
    .unwrap();

    let reports = reports.lock().unwrap();
    // Two segments: 0%, 50%, then the final 100%.
    let percents: Vec<u8> = reports.iter().map(|(p, _)| *p).collect();
    assert_eq!(percents, vec![0, 50, 100]);
    assert!(reports[0].1.contains("1/2"));
    assert!(reports[1].1.contains("2/2"));
    // Non-decreasing throughout.
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_invalid_config_rejected_before_any_call() {
    let client = MockExtractor::new();
    let mut config = test_config(4);
    config.profile.max_chunk_chars = 0;
    let run = ExtractionRun::with_config(client, config);

    let result = run.run("前四个字后四个字", RunOptions::new()).await;

    assert!(matches!(result, Err(ExtractionError::Config(_))));
    assert_eq!(run.client().call_count(), 0);
}

#[tokio::test]
async fn test_empty_document_completes_with_nothing() {
    let client = MockExtractor::new();
    let run = ExtractionRun::with_config(client, test_config(4));

    let outcome = run.run("", RunOptions::new()).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.characters.is_empty());
    assert!(outcome.scenes.is_empty());
    assert!(outcome.debug_log.is_empty());
    assert_eq!(run.client().call_count(), 0);
}
