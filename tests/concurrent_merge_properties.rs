//! Property: however replies interleave, merged totals equal the sum over all chunks

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use pomaia_chunking::{ChunkPlanner, ChunkingConfig, HeuristicEstimator};
use pomaia_pipeline::{prompts::PULL_QUOTES_PROMPT, ArtifactState, Pipeline, ResultStore};
use pomaia_providers::{ChatCompletion, ChatRequest, Provider, ProviderError, StructuredCaller};
use pomaia_storage::MemoryStore;
use proptest::prelude::*;

/// The n-th pull-quote call answers with `script[n % len]` quotes and tokens after a jittered delay
struct ScriptOracle {
    script: Vec<(usize, u64, u64)>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Provider for ScriptOracle {
    fn id(&self) -> &str {
        "script"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError> {
        if request.messages[0].content != PULL_QUOTES_PROMPT {
            return Ok(ChatCompletion::from_content(
                r#"{"titles":[],"topics":[],"summary":""}"#,
                1,
            ));
        }

        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (quotes, tokens, delay_ms) = self.script[n % self.script.len()];
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        let quotes: Vec<_> = (0..quotes)
            .map(|i| serde_json::json!({"original": format!("q{}-{}", n, i), "suggestion": format!("Q{}-{}", n, i)}))
            .collect();
        Ok(ChatCompletion::from_content(
            serde_json::json!({ "quotes": quotes }).to_string(),
            tokens,
        ))
    }
}

fn planner() -> ChunkPlanner {
    ChunkPlanner::new(
        ChunkingConfig {
            chunk_tokens: 10,
            chunk_overlap: 0,
            working_tokens: 1,
        },
        Arc::new(HeuristicEstimator),
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_merged_totals_match_chunk_replies(
        script in prop::collection::vec((0usize..4, 0u64..50, 0u64..5), 1..6),
        paragraphs in 1usize..6,
        max_concurrency in prop::option::of(1usize..4),
    ) {
        let text = (0..paragraphs)
            .map(|i| format!("Paragraph {} talks about the harvest and the rain.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let calls = planner().split(&text).len();

        let expected_quotes: usize = (0..calls).map(|n| script[n % script.len()].0).sum();
        let expected_tokens: u64 = (0..calls).map(|n| script[n % script.len()].1).sum();

        let oracle = Arc::new(ScriptOracle { script, calls: AtomicUsize::new(0) });
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let results = runtime.block_on(async {
            let pipeline = Pipeline::builder(
                StructuredCaller::new(oracle.clone(), "test-model"),
                ResultStore::new(Arc::new(MemoryStore::new())),
            )
            .planner(planner())
            .max_concurrency(max_concurrency)
            .build()
            .unwrap();

            pipeline.process_text(&text).await.unwrap();
            pipeline.results().await
        });

        prop_assert_eq!(oracle.calls.load(Ordering::SeqCst), calls);
        prop_assert_eq!(results.quotes.state, ArtifactState::Completed);
        prop_assert_eq!(results.quotes.data.len(), expected_quotes);
        prop_assert_eq!(results.quotes.tokens_used, expected_tokens);
    }
}
