//! CLI parsing, context overrides and commands against a mock oracle server

use std::path::PathBuf;

use clap::Parser;
use mockito::Matcher;
use pomaia_cli::{
    commands::{ChunksCommand, Command, HealthCommand, ProcessCommand, ShowCommand},
    output::OutputStyle,
    router::RegenerateArg,
    AppContext, Cli, CliError, Commands, Overrides,
};
use pomaia_pipeline::{AppConfig, ArtifactState, PipelineConfig, PipelineResult, QuoteRecord};
use pomaia_providers::OracleConfig;
use tempfile::TempDir;

fn context(base_url: &str, data_dir: PathBuf) -> AppContext {
    let config = AppConfig {
        oracle: OracleConfig {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            ..OracleConfig::default()
        },
        pipeline: PipelineConfig {
            data_dir,
            ..PipelineConfig::default()
        },
    };
    AppContext::with_config(config, &Overrides::default()).unwrap()
}

fn completion(content: &str, tokens: u64) -> String {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"total_tokens": tokens}
    })
    .to_string()
}

#[test]
fn test_parse_process_with_global_flags() {
    let cli = Cli::try_parse_from([
        "pomaia",
        "process",
        "talk.txt",
        "--model",
        "llama3",
        "--data-dir",
        "/tmp/pomaia",
        "-v",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Process { file: Some(ref f) } if f == &PathBuf::from("talk.txt")));
    assert!(cli.verbose);
    let overrides = cli.overrides();
    assert_eq!(overrides.model.as_deref(), Some("llama3"));
    assert_eq!(overrides.data_dir, Some(PathBuf::from("/tmp/pomaia")));
}

#[test]
fn test_parse_regenerate_targets() {
    let cli = Cli::try_parse_from(["pomaia", "regenerate", "summary"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Regenerate {
            target: RegenerateArg::Summary
        }
    ));

    assert!(Cli::try_parse_from(["pomaia", "regenerate", "everything"]).is_err());
    assert!(Cli::try_parse_from(["pomaia"]).is_err());
}

#[test]
fn test_overrides_win_and_are_validated() {
    let overrides = Overrides {
        base_url: Some("http://127.0.0.1:8080/v1".to_string()),
        model: Some("qwen2".to_string()),
        ..Overrides::default()
    };
    let ctx = AppContext::with_config(AppConfig::default(), &overrides).unwrap();
    assert_eq!(ctx.config.oracle.base_url, "http://127.0.0.1:8080/v1");
    assert_eq!(ctx.config.oracle.model, "qwen2");

    let bad = Overrides {
        base_url: Some("ftp://nowhere".to_string()),
        ..Overrides::default()
    };
    let err = AppContext::with_config(AppConfig::default(), &bad).err().unwrap();
    assert!(matches!(err, CliError::Config(_)));
}

#[tokio::test]
async fn test_show_renders_stored_results() {
    let dir = TempDir::new().unwrap();
    let ctx = context("http://localhost:11434/v1", dir.path().to_path_buf());

    let mut results = PipelineResult::empty();
    results.quotes.merge(vec![QuoteRecord::new("a quote", "A quote.")], 9);
    results.quotes.state = ArtifactState::Completed;
    ctx.result_store().save_results(&results).await.unwrap();

    let json = ShowCommand::new(context("http://localhost:11434/v1", dir.path().to_path_buf()), true)
        .render(&OutputStyle::plain())
        .await
        .unwrap();
    let parsed: PipelineResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, results);

    let text = ShowCommand::new(ctx, false)
        .render(&OutputStyle::plain())
        .await
        .unwrap();
    assert!(text.contains("1. A quote."));
}

#[test]
fn test_chunk_plan_uses_configured_budgets() {
    let dir = TempDir::new().unwrap();
    let ctx = context("http://localhost:11434/v1", dir.path().to_path_buf());
    let command = ChunksCommand::new(ctx, None);

    assert!(command.plan("").unwrap().is_empty());
    let chunks = command.plan("Sentence one. Sentence two. Sentence three.").unwrap();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].token_length > 0);
}

#[tokio::test]
async fn test_health_command() {
    let mut server = mockito::Server::new_async().await;
    let up = server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    HealthCommand::new(context(&server.url(), dir.path().to_path_buf()))
        .execute()
        .await
        .unwrap();
    up.assert_async().await;
}

#[tokio::test]
async fn test_health_command_reports_unhealthy_server() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(503)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let err = HealthCommand::new(context(&server.url(), dir.path().to_path_buf()))
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Oracle(_)));
}

#[tokio::test]
async fn test_process_command_persists_results() {
    let mut server = mockito::Server::new_async().await;
    let quotes = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("pull out the top 5".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(
            "```json\n{\"quotes\": [{\"original\": \"Sentence one.\", \"suggestion\": \"Sentence one.\"},]}\n```",
            10,
        ))
        .create_async()
        .await;
    let summary = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("rewrite the content you are".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(r#"{"titles":["T"],"topics":["Topic"],"summary":"S"}"#, 5))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("talk.txt");
    std::fs::write(&input, "Sentence one. Sentence two. Sentence three.").unwrap();
    let data_dir = dir.path().join("data");

    ProcessCommand::new(context(&server.url(), data_dir.clone()), Some(input))
        .execute()
        .await
        .unwrap();

    quotes.assert_async().await;
    summary.assert_async().await;

    let stored = context(&server.url(), data_dir)
        .result_store()
        .load_results()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.quotes.data.len(), 1);
    assert_eq!(stored.quotes.tokens_used, 10);
    assert_eq!(stored.summary.summary, "S");
    assert_eq!(stored.summary.tokens_used, 5);
}

#[tokio::test]
async fn test_process_command_surfaces_oracle_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("talk.txt");
    std::fs::write(&input, "Sentence one.").unwrap();

    let err = ProcessCommand::new(context(&server.url(), dir.path().join("data")), Some(input))
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Pipeline(_)));
    assert!(err.user_message().contains("Oracle API error"));
}
