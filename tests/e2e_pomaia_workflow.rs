//! End-to-end workflow over the disk store: process, restart, regenerate, clear

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pomaia_chunking::{ChunkPlanner, ChunkingConfig, HeuristicEstimator};
use pomaia_pipeline::{
    prompts::PULL_QUOTES_PROMPT, ArtifactState, Pipeline, ResultStore,
};
use pomaia_providers::{ChatCompletion, ChatRequest, Provider, ProviderError, StructuredCaller};
use pomaia_storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

/// Answers every pull-quote call with the chunk itself as the quote
struct EchoOracle {
    summaries: AtomicUsize,
}

#[async_trait::async_trait]
impl Provider for EchoOracle {
    fn id(&self) -> &str {
        "echo"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        let system = &request.messages[0].content;
        let user = &request.messages[1].content;

        if system == PULL_QUOTES_PROMPT {
            let reply = serde_json::json!({
                "quotes": [{"original": user, "suggestion": user.to_uppercase()}]
            });
            Ok(ChatCompletion::from_content(reply.to_string(), 4))
        } else {
            let run = self.summaries.fetch_add(1, Ordering::SeqCst) + 1;
            let reply = serde_json::json!({
                "titles": [format!("Title {}", run)],
                "topics": ["interviews"],
                "summary": format!("{} bytes summarized", user.len()),
            });
            Ok(ChatCompletion::from_content(reply.to_string(), 7))
        }
    }
}

async fn open(dir: &TempDir, oracle: Arc<EchoOracle>) -> Pipeline {
    let backend: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    Pipeline::builder(
        StructuredCaller::new(oracle, "test-model"),
        ResultStore::new(backend),
    )
    .planner(
        ChunkPlanner::new(
            ChunkingConfig {
                chunk_tokens: 10,
                chunk_overlap: 0,
                working_tokens: 12,
            },
            Arc::new(HeuristicEstimator),
        )
        .unwrap(),
    )
    .hydrate()
    .await
    .unwrap()
}

#[tokio::test]
async fn test_results_survive_restart_and_regenerate() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(EchoOracle {
        summaries: AtomicUsize::new(0),
    });
    let text = "We started in a garage.\n\nThe first customers were friends.\n\nThen the team grew to forty people.";

    let first = open(&dir, oracle.clone()).await;
    first.process_text(text).await.unwrap();
    let processed = first.results().await;
    assert_eq!(processed.quotes.state, ArtifactState::Completed);
    assert_eq!(processed.summary.state, ArtifactState::Completed);
    assert!(!processed.quotes.data.is_empty());
    assert_eq!(processed.quotes.tokens_used, 4 * processed.quotes.data.len() as u64);
    assert_eq!(processed.summary.titles, vec!["Title 1"]);
    drop(first);

    let second = open(&dir, oracle.clone()).await;
    assert_eq!(second.source_text().await, text);
    assert_eq!(second.results().await, processed);
    assert_eq!(second.error().await, None);

    second.regenerate_summary().await.unwrap();
    let regenerated = second.results().await;
    assert_eq!(regenerated.quotes, processed.quotes);
    assert_eq!(regenerated.summary.titles, vec!["Title 2"]);
    assert_eq!(
        regenerated.summary.summary,
        format!("{} bytes summarized", processed.quotes.suggestions().join("\n\n").len())
    );

    second.clear().await.unwrap();
    drop(second);

    let third = open(&dir, oracle).await;
    assert!(third.source_text().await.is_empty());
    assert!(!third.results().await.has_output());
}

#[tokio::test]
async fn test_stored_quotes_feed_summary_in_order() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(EchoOracle {
        summaries: AtomicUsize::new(0),
    });
    let pipeline = open(&dir, oracle).await;

    pipeline
        .process_text("alpha beta gamma delta.\n\nepsilon zeta eta theta.")
        .await
        .unwrap();

    let results = pipeline.results().await;
    for quote in &results.quotes.data {
        assert_eq!(quote.suggestion, quote.original.to_uppercase());
    }
    assert_eq!(
        results.summary.summary,
        format!("{} bytes summarized", results.quotes.suggestions().join("\n\n").len())
    );
}
