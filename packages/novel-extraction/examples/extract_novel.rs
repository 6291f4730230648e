//! Extraction walkthrough - reference usage of the pipeline.
//!
//! Demonstrates the full flow an application would drive:
//! 1. Split the document into chapters for navigation
//! 2. Run the incremental extraction pipeline with progress reporting
//! 3. Normalize the prose with the extracted entities
//!
//! Runs against the mock client so it needs no credentials; swap in
//! `GeminiClient::from_env()` (feature `gemini`) for real extraction.
//!
//! ```bash
//! cargo run --example extract_novel
//! ```

use std::sync::Arc;

use novel_extraction::testing::MockExtractor;
use novel_extraction::{
    split_chapters, normalize_entities, ExtractionRun, ModelProfile, PipelineConfig,
    RunCoordinator, RunOptions,
};

const SAMPLE: &str = "第一章 出发\n却说三藏辞别了唐王,踏上西行之路。\n第二章 收徒\n行至两界山,三藏救出了被压五百年的孙悟空。";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "novel_extraction=info".into()),
        )
        .init();

    // Chapters are independent of the pipeline.
    let chapters = split_chapters(SAMPLE);
    println!("chapters:");
    for chapter in &chapters {
        println!("  {} | {}", chapter.title, chapter.anchor_line);
    }

    // A mock service that recognizes the monk and his apprentice.
    let client = MockExtractor::new()
        .with_payload(
            r#"{
                "characters": [
                    {"group_name": "唐僧", "name": "三藏", "aliases": ["唐僧"], "role": "primary"}
                ],
                "scenes": [
                    {"group_name": "长安", "name": "城门", "structure": "exterior", "kind": "transition"}
                ]
            }"#,
        )
        .with_payload(
            r#"{
                "characters": [
                    {"group_name": "孙悟空", "name": "行者", "aliases": ["悟空"], "role": "primary"}
                ],
                "scenes": [
                    {"group_name": "两界山", "name": "山脚", "structure": "exterior", "kind": "plot-point"}
                ]
            }"#,
        );

    let config = PipelineConfig::new(ModelProfile::new("mock-model", 40, 0));
    let run = ExtractionRun::with_config(client, config);

    // One active run per document; a second `begin()` would cancel this one.
    let coordinator = RunCoordinator::new();
    let slot = coordinator.begin().await;

    let progress = Arc::new(|percent: u8, status: &str| {
        println!("  [{:>3}%] {}", percent, status);
    });

    let outcome = run
        .run(
            SAMPLE,
            RunOptions::new()
                .with_cancel(slot.token.clone())
                .with_progress(progress),
        )
        .await?;

    println!("extracted {} characters, {} scenes", outcome.characters.len(), outcome.scenes.len());
    for character in &outcome.characters {
        println!("  character: {} / {}", character.group_name, character.name);
    }
    for scene in &outcome.scenes {
        println!("  scene: {} / {} (x{})", scene.group_name, scene.name, scene.frequency);
    }

    // Rewrite the prose with canonical tags.
    let normalized = normalize_entities(SAMPLE, &outcome.characters, &outcome.scenes);
    println!("normalized:\n{}", normalized);

    Ok(())
}
