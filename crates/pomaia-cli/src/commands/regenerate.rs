//! `pomaia regenerate` - rerun one stage over the persisted state

use crate::{
    commands::{
        process::{finish_progress, report_progress},
        Command,
    },
    context::AppContext,
    error::{CliError, CliResult},
    output::OutputStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateTarget {
    Highlights,
    Summary,
}

pub struct RegenerateCommand {
    context: AppContext,
    target: RegenerateTarget,
}

impl RegenerateCommand {
    pub fn new(context: AppContext, target: RegenerateTarget) -> Self {
        Self { context, target }
    }
}

#[async_trait::async_trait]
impl Command for RegenerateCommand {
    async fn execute(&self) -> CliResult<()> {
        let pipeline = self.context.pipeline().await?;

        if self.target == RegenerateTarget::Highlights && pipeline.source_text().await.is_empty() {
            return Err(CliError::InvalidArgument {
                message: "no stored transcript; run 'pomaia process' first".to_string(),
            });
        }

        let progress = tokio::spawn(report_progress(pipeline.subscribe()));
        let outcome = match self.target {
            RegenerateTarget::Highlights => pipeline.regenerate_highlights().await,
            RegenerateTarget::Summary => pipeline.regenerate_summary().await,
        };
        let results = pipeline.results().await;
        finish_progress(pipeline, progress).await;

        println!("{}", OutputStyle::default().render_results(&results));

        outcome?;
        Ok(())
    }
}
