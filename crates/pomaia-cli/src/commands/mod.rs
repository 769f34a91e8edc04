//! Command handlers for the pomaia CLI

pub mod chunks;
pub mod clear;
pub mod health;
pub mod process;
pub mod regenerate;
pub mod show;

pub use chunks::ChunksCommand;
pub use clear::ClearCommand;
pub use health::HealthCommand;
pub use process::ProcessCommand;
pub use regenerate::{RegenerateCommand, RegenerateTarget};
pub use show::ShowCommand;

use std::{io::Read, path::Path};

use crate::error::{CliError, CliResult};

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self) -> CliResult<()>;
}

/// Transcript from `path`, or stdin when no path (or `-`) is given
pub(crate) fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            CliError::InvalidArgument {
                message: format!("cannot read {}: {}", path.display(), e),
            }
        }),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
