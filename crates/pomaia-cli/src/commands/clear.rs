//! `pomaia clear` - forget the stored transcript and results

use crate::{commands::Command, context::AppContext, error::CliResult, output::print_success};

pub struct ClearCommand {
    context: AppContext,
}

impl ClearCommand {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }
}

#[async_trait::async_trait]
impl Command for ClearCommand {
    async fn execute(&self) -> CliResult<()> {
        self.context.result_store().clear().await?;
        print_success("Stored transcript and results removed");
        Ok(())
    }
}
