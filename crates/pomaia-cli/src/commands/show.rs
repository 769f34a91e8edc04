//! `pomaia show` - print the persisted result

use crate::{
    commands::Command,
    context::AppContext,
    error::{CliError, CliResult},
    output::OutputStyle,
};

pub struct ShowCommand {
    context: AppContext,
    json: bool,
}

impl ShowCommand {
    pub fn new(context: AppContext, json: bool) -> Self {
        Self { context, json }
    }

    pub async fn render(&self, style: &OutputStyle) -> CliResult<String> {
        let results = self
            .context
            .result_store()
            .load_results()
            .await?
            .unwrap_or_default();

        if self.json {
            serde_json::to_string_pretty(&results).map_err(|e| CliError::Internal(e.to_string()))
        } else {
            Ok(style.render_results(&results))
        }
    }
}

#[async_trait::async_trait]
impl Command for ShowCommand {
    async fn execute(&self) -> CliResult<()> {
        println!("{}", self.render(&OutputStyle::default()).await?);
        Ok(())
    }
}
