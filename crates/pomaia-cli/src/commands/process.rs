//! `pomaia process` - run the full pipeline over a transcript

use std::path::PathBuf;

use pomaia_pipeline::{Pipeline, PipelineEvent, Stage};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    commands::{read_input, Command},
    context::AppContext,
    error::CliResult,
    logging,
    output::{print_warning, OutputStyle},
};

pub struct ProcessCommand {
    context: AppContext,
    input: Option<PathBuf>,
}

impl ProcessCommand {
    pub fn new(context: AppContext, input: Option<PathBuf>) -> Self {
        Self { context, input }
    }
}

#[async_trait::async_trait]
impl Command for ProcessCommand {
    async fn execute(&self) -> CliResult<()> {
        let text = read_input(self.input.as_deref())?;
        if text.trim().is_empty() {
            print_warning("Input is empty; only the summary call will be made");
        }

        let pipeline = self.context.pipeline().await?;
        let progress = tokio::spawn(report_progress(pipeline.subscribe()));

        let outcome = pipeline.process_text(&text).await;
        let results = pipeline.results().await;
        finish_progress(pipeline, progress).await;

        println!("{}", OutputStyle::default().render_results(&results));

        outcome?;
        Ok(())
    }
}

/// Drop the last pipeline handle so the event channel closes, then wait for the
/// progress task to print whatever was still buffered
pub(crate) async fn finish_progress(pipeline: Pipeline, progress: JoinHandle<()>) {
    drop(pipeline);
    if let Err(e) = progress.await {
        debug!(error = %e, "Progress reporter stopped abnormally");
    }
}

/// Print stage progress until the channel closes
pub(crate) async fn report_progress(events: broadcast::Receiver<PipelineEvent>) {
    forward_progress(events, |line| logging::progress(&line)).await;
}

/// Render each event to a progress line and hand it to `emit`, draining the
/// channel until every sender is gone
pub(crate) async fn forward_progress<F>(mut events: broadcast::Receiver<PipelineEvent>, mut emit: F)
where
    F: FnMut(String),
{
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = progress_line(&event) {
                    emit(line);
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

fn progress_line(event: &PipelineEvent) -> Option<String> {
    match event {
        PipelineEvent::StageStarted { stage: Stage::Highlights, calls } => {
            Some(format!("Extracting highlights from {} chunk(s)...", calls))
        }
        PipelineEvent::StageStarted { stage: Stage::Summary, .. } => {
            Some("Synthesizing summary...".to_string())
        }
        PipelineEvent::ChunkMerged { completed, total, quotes, .. } => {
            Some(format!("  chunk {}/{}: {} quote(s)", completed, total, quotes))
        }
        PipelineEvent::StageFailed { stage, error } => Some(format!("{} failed: {}", stage, error)),
        _ => None,
    }
}
