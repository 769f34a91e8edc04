//! Summary synthesis stage

use pomaia_providers::StructuredCaller;
use tracing::{info, warn};

use crate::{
    error::{PipelineError, Result},
    highlights::StageContext,
    models::{ArtifactState, SummaryReply, SummaryResult},
    notifications::{PipelineEvent, Stage},
    prompts::SUMMARY_PROMPT,
};

/// Turns quote suggestions into titles, topics and a summary with one oracle call
pub struct SummarySynthesizer {
    caller: StructuredCaller,
}

impl SummarySynthesizer {
    pub fn new(caller: StructuredCaller) -> Self {
        Self { caller }
    }

    /// Reset the summary, then replace it wholesale with the oracle's reply.
    ///
    /// Always issues exactly one call, even for an empty suggestion list.
    pub async fn synthesize(&self, suggestions: &[String], ctx: &StageContext) -> Result<SummaryResult> {
        if let Err(e) = ctx
            .update(|results| results.summary = SummaryResult::running())
            .await
        {
            return Err(fail(e, ctx).await);
        }

        info!(suggestions = suggestions.len(), "Synthesizing summary");
        ctx.notifications.publish(PipelineEvent::StageStarted {
            stage: Stage::Summary,
            calls: 1,
        });

        let content = suggestions.join("\n\n");
        let reply = match self.caller.call::<SummaryReply>(SUMMARY_PROMPT, &content).await {
            Ok(reply) => reply,
            Err(e) => {
                let error: PipelineError = e.into();
                warn!(error = %error, "Summary call failed");
                return Err(fail(error, ctx).await);
            }
        };

        let summary = SummaryResult::completed(reply.result, reply.tokens_used);
        if let Err(e) = ctx.update(|results| results.summary = summary.clone()).await {
            return Err(fail(e, ctx).await);
        }

        info!(tokens_used = summary.tokens_used, titles = summary.titles.len(), "Summary synthesized");
        ctx.notifications.publish(PipelineEvent::StageCompleted {
            stage: Stage::Summary,
            tokens_used: summary.tokens_used,
        });

        Ok(summary)
    }
}

/// Mark the summary failed (persisting it if the store allows) and hand `error` back
async fn fail(error: PipelineError, ctx: &StageContext) -> PipelineError {
    ctx.settle(|results| results.summary.state = ArtifactState::Failed)
        .await;
    ctx.notifications.publish(PipelineEvent::StageFailed {
        stage: Stage::Summary,
        error: error.to_string(),
    });
    error
}
