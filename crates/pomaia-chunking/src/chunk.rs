use serde::{Deserialize, Serialize};
use tracing::trace;

/// A coalesced group of adjacent sub-chunks, sized toward the working budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingChunk {
    pub text: String,
    #[serde(alias = "token_length")]
    pub token_length: usize,
}

impl WorkingChunk {
    pub fn new(text: impl Into<String>, token_length: usize) -> Self {
        Self {
            text: text.into(),
            token_length,
        }
    }
}

/// Greedily merge adjacent sub-chunks while the running total stays strictly below
/// `working_tokens`.
///
/// Merged text is joined with `\n` and token lengths are summed, so a single
/// sub-chunk larger than the budget still becomes its own working chunk.
pub fn coalesce<I>(sub_chunks: I, working_tokens: usize) -> Vec<WorkingChunk>
where
    I: IntoIterator<Item = WorkingChunk>,
{
    let mut closed = Vec::new();
    let mut iter = sub_chunks.into_iter();

    let Some(mut current) = iter.next() else {
        return closed;
    };

    for next in iter {
        if current.token_length + next.token_length < working_tokens {
            current.text.push('\n');
            current.text.push_str(&next.text);
            current.token_length += next.token_length;
        } else {
            trace!(token_length = current.token_length, "Closing working chunk");
            closed.push(std::mem::replace(&mut current, next));
        }
    }

    closed.push(current);
    closed
}
