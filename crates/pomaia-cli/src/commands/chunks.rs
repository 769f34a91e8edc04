//! `pomaia chunks` - show the working-chunk plan without calling the oracle

use std::path::PathBuf;

use pomaia_chunking::{ChunkPlanner, WorkingChunk};

use crate::{
    commands::{read_input, Command},
    context::AppContext,
    error::{CliError, CliResult},
    output::OutputStyle,
};

pub struct ChunksCommand {
    context: AppContext,
    input: Option<PathBuf>,
}

impl ChunksCommand {
    pub fn new(context: AppContext, input: Option<PathBuf>) -> Self {
        Self { context, input }
    }

    pub fn plan(&self, text: &str) -> CliResult<Vec<WorkingChunk>> {
        let planner = ChunkPlanner::with_tiktoken(self.context.config.pipeline.chunking())
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(planner.split(text))
    }
}

#[async_trait::async_trait]
impl Command for ChunksCommand {
    async fn execute(&self) -> CliResult<()> {
        let text = read_input(self.input.as_deref())?;
        let chunks = self.plan(&text)?;
        println!("{}", OutputStyle::default().render_chunks(&chunks));
        Ok(())
    }
}
