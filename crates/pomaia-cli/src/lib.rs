//! PoMAIA command line interface

pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use context::{AppContext, Overrides};
pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter, Commands};
