//! `pomaia health` - check that the configured oracle answers

use crate::{
    commands::Command,
    context::AppContext,
    error::{CliError, CliResult},
    output::print_success,
};

pub struct HealthCommand {
    context: AppContext,
}

impl HealthCommand {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }
}

#[async_trait::async_trait]
impl Command for HealthCommand {
    async fn execute(&self) -> CliResult<()> {
        let oracle = &self.context.config.oracle;
        let provider = self.context.provider()?;

        if provider.health_check().await? {
            print_success(&format!("{} is up (model: {})", oracle.base_url, oracle.model));
            Ok(())
        } else {
            Err(CliError::Oracle(format!(
                "{} answered but is not healthy",
                oracle.base_url
            )))
        }
    }
}
