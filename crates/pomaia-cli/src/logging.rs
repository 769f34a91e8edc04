//! Logging and verbosity control

use std::sync::atomic::{AtomicU8, Ordering};

use tracing_subscriber::EnvFilter;

static VERBOSITY: AtomicU8 = AtomicU8::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Results only
    Quiet = 0,
    /// Results plus progress lines
    Normal = 1,
    /// Debug logging
    Verbose = 2,
}

impl VerbosityLevel {
    pub fn current() -> Self {
        match VERBOSITY.load(Ordering::Relaxed) {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Normal,
            _ => VerbosityLevel::Verbose,
        }
    }

    pub fn set(level: Self) {
        VERBOSITY.store(level as u8, Ordering::Relaxed);
    }

    pub fn should_output(&self) -> bool {
        self <= &Self::current()
    }

    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Default filter when `RUST_LOG` is not set
    fn default_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "pomaia=debug,pomaia_cli=debug,pomaia_pipeline=debug,pomaia_providers=debug,pomaia_chunking=debug,pomaia_storage=debug",
        }
    }
}

/// Install the tracing subscriber; `RUST_LOG` wins over the flags
pub fn init_logging(verbose: bool, quiet: bool) -> anyhow::Result<()> {
    let level = VerbosityLevel::from_flags(verbose, quiet);
    VerbosityLevel::set(level);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))
}

/// Progress line on stderr, suppressed in quiet mode
pub fn progress(message: &str) {
    if VerbosityLevel::Normal.should_output() {
        eprintln!("{}", message);
    }
}
