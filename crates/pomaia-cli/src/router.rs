//! Command line parsing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    commands::*,
    context::{AppContext, Overrides},
    error::CliResult,
};

/// PoMAIA - key quotes and a summary from long interview transcripts
#[derive(Parser, Debug)]
#[command(name = "pomaia")]
#[command(bin_name = "pomaia")]
#[command(about = "Pull key quotes and a summary out of long transcripts with a local model")]
#[command(
    long_about = "PoMAIA splits a long transcript into chunks, asks a locally running model for the key quotes of every chunk, then asks it for titles, topics and a summary of those quotes.\n\nResults are stored in the data directory so either part can be regenerated later.\n\nQuick start:\n  pomaia health              Check the model server\n  pomaia process talk.txt    Run the full pipeline\n  pomaia show                Print the stored results"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Extra config file, read after the global and project ones
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model identifier sent to the oracle
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible server
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory holding the stored transcript and results
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results only
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the full pipeline over a transcript
    Process {
        /// Transcript file (stdin when omitted or `-`)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Rerun one stage over the stored state
    Regenerate {
        #[arg(value_enum)]
        target: RegenerateArg,
    },

    /// Print the stored results
    Show {
        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
    },

    /// Print the working-chunk plan without calling the oracle
    Chunks {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Remove the stored transcript and results
    Clear,

    /// Check that the configured oracle answers
    Health,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateArg {
    Highlights,
    Summary,
}

impl From<RegenerateArg> for RegenerateTarget {
    fn from(arg: RegenerateArg) -> Self {
        match arg {
            RegenerateArg::Highlights => RegenerateTarget::Highlights,
            RegenerateArg::Summary => RegenerateTarget::Summary,
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

pub struct CommandRouter;

impl CommandRouter {
    /// Build the handler for `cli.command` with the loaded context
    pub fn handler(cli: &Cli, context: AppContext) -> Box<dyn Command> {
        match &cli.command {
            Commands::Process { file } => Box::new(ProcessCommand::new(context, file.clone())),
            Commands::Regenerate { target } => {
                Box::new(RegenerateCommand::new(context, (*target).into()))
            }
            Commands::Show { json } => Box::new(ShowCommand::new(context, *json)),
            Commands::Chunks { file } => Box::new(ChunksCommand::new(context, file.clone())),
            Commands::Clear => Box::new(ClearCommand::new(context)),
            Commands::Health => Box::new(HealthCommand::new(context)),
        }
    }

    pub async fn execute(cli: &Cli) -> CliResult<()> {
        let context = AppContext::load(&cli.overrides())?;
        Self::handler(cli, context).execute().await
    }
}
