//! Output formatting and styling

use colored::Colorize;
use pomaia_chunking::WorkingChunk;
use pomaia_pipeline::{ArtifactState, PipelineResult};

pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().underline().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn state_label(&self, state: ArtifactState) -> String {
        let label = match state {
            ArtifactState::NotRun => "not run",
            ArtifactState::Running => "running",
            ArtifactState::Completed => "completed",
            ArtifactState::Failed => "failed",
        };
        if !self.use_colors {
            return label.to_string();
        }
        match state {
            ArtifactState::Completed => label.green().to_string(),
            ArtifactState::Failed => label.red().to_string(),
            _ => label.yellow().to_string(),
        }
    }

    /// Human-readable rendering of highlights and summary
    pub fn render_results(&self, results: &PipelineResult) -> String {
        let mut out = Vec::new();

        let quotes = &results.quotes;
        out.push(self.heading(&format!(
            "Highlights ({}, {} quotes, {} tokens)",
            self.state_label(quotes.state),
            quotes.data.len(),
            quotes.tokens_used
        )));
        if quotes.data.is_empty() {
            out.push(self.dim("  (none)"));
        }
        for (idx, quote) in quotes.data.iter().enumerate() {
            out.push(format!("{:>3}. {}", idx + 1, quote.suggestion));
            if quote.original != quote.suggestion {
                out.push(self.dim(&format!("     original: {}", quote.original)));
            }
        }

        out.push(String::new());

        let summary = &results.summary;
        out.push(self.heading(&format!(
            "Summary ({}, {} tokens)",
            self.state_label(summary.state),
            summary.tokens_used
        )));
        if !summary.summary.is_empty() {
            out.push(summary.summary.clone());
        }
        if !summary.titles.is_empty() {
            out.push(String::new());
            out.push(self.heading("Titles"));
            out.extend(summary.titles.iter().map(|t| format!("  - {}", t)));
        }
        if !summary.topics.is_empty() {
            out.push(String::new());
            out.push(format!("{} {}", self.heading("Topics:"), summary.topics.join(", ")));
        }

        out.join("\n")
    }

    /// Working-chunk plan: one line per chunk plus a total
    pub fn render_chunks(&self, chunks: &[WorkingChunk]) -> String {
        let mut out = vec![self.heading(&format!("{} working chunk(s)", chunks.len()))];
        for (idx, chunk) in chunks.iter().enumerate() {
            let preview: String = chunk.text.chars().take(60).collect();
            out.push(format!(
                "{:>3}. {:>6} tokens  {}",
                idx + 1,
                chunk.token_length,
                self.dim(&preview.replace('\n', " "))
            ));
        }
        let total: usize = chunks.iter().map(|c| c.token_length).sum();
        out.push(format!("total: {} tokens", total));
        out.join("\n")
    }
}

pub fn print_success(msg: &str) {
    println!("{}", OutputStyle::default().success(msg));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}

pub fn print_warning(msg: &str) {
    eprintln!("{}", OutputStyle::default().warning(msg));
}
