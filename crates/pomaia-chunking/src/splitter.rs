//! Recursive boundary-seeking splitter
//!
//! Tries the coarsest separator present in the text first (paragraphs), and only
//! falls back to finer ones (lines, sentences, words, characters) for pieces that
//! are still over budget. Small neighbouring pieces are then packed back together
//! up to `chunk_size`, repeating up to `chunk_overlap` tokens of the previous
//! chunk's tail at the start of the next.

use std::{collections::VecDeque, sync::Arc};

use crate::{
    error::{ChunkingError, ChunkingResult},
    tokenizer::TokenEstimator,
};

/// Paragraph, line, sentence, word, character
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    estimator: Arc<dyn TokenEstimator>,
}

impl RecursiveSplitter {
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        estimator: Arc<dyn TokenEstimator>,
    ) -> ChunkingResult<Self> {
        if chunk_size == 0 {
            return Err(ChunkingError::InvalidConfig(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(ChunkingError::InvalidConfig(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            estimator,
        })
    }

    /// Replace the separator hierarchy (coarsest first)
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn estimator(&self) -> &Arc<dyn TokenEstimator> {
        &self.estimator
    }

    /// Split `text` into ordered, trimmed, non-empty sub-chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, finer) = pick_separator(text, separators);

        let mut chunks = Vec::new();
        let mut pending: Vec<(&str, usize)> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            let len = self.estimator.estimate(piece);
            if len < self.chunk_size {
                pending.push((piece, len));
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                push_trimmed(&mut chunks, piece);
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    fn merge(&self, pieces: &[(&str, usize)]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &(piece, len) in pieces {
            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut chunks, &join(&window));

                // keep at most `chunk_overlap` tokens of tail, and make room for `piece`
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        if !window.is_empty() {
            push_trimmed(&mut chunks, &join(&window));
        }

        chunks
    }
}

fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (idx, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if text.contains(separator.as_str()) {
            return (separator.as_str(), &separators[idx + 1..]);
        }
    }

    match separators.last() {
        Some(last) => (last.as_str(), &[]),
        None => ("", &[]),
    }
}

/// Split on `separator`, leaving it attached to the end of each piece
fn split_keeping_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(idx, c)| &text[idx..idx + c.len_utf8()])
            .collect();
    }

    text.split_inclusive(separator).collect()
}

fn join(window: &VecDeque<(&str, usize)>) -> String {
    window.iter().map(|(piece, _)| *piece).collect()
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HeuristicEstimator;

    /// One token per whitespace-separated word
    struct WordEstimator;

    impl TokenEstimator for WordEstimator {
        fn estimate(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn words(chunk_size: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(chunk_size, overlap, Arc::new(WordEstimator)).unwrap()
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(RecursiveSplitter::new(4, 4, Arc::new(HeuristicEstimator)).is_err());
        assert!(RecursiveSplitter::new(0, 0, Arc::new(HeuristicEstimator)).is_err());
    }

    #[test]
    fn test_empty_and_blank_text() {
        let splitter = words(10, 1);
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text("  \n\n \n").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = words(10, 1);
        assert_eq!(
            splitter.split_text("Sentence one. Sentence two."),
            vec!["Sentence one. Sentence two.".to_string()]
        );
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let splitter = words(5, 0);
        let text = "one two three\n\nfour five six";
        assert_eq!(
            splitter.split_text(text),
            vec!["one two three".to_string(), "four five six".to_string()]
        );
    }

    #[test]
    fn test_sentence_boundaries_before_words() {
        let splitter = words(4, 0);
        let text = "Alpha beta gamma. Delta epsilon zeta.";
        assert_eq!(
            splitter.split_text(text),
            vec!["Alpha beta gamma.".to_string(), "Delta epsilon zeta.".to_string()]
        );
    }

    #[test]
    fn test_overlap_repeats_tail() {
        let splitter = words(3, 1);
        let chunks = splitter.split_text("a b c d e");
        assert_eq!(chunks, vec!["a b c".to_string(), "c d e".to_string()]);
    }

    #[test]
    fn test_falls_back_to_characters() {
        let splitter = RecursiveSplitter::new(2, 0, Arc::new(HeuristicEstimator)).unwrap();
        let chunks = splitter.split_text("abcdefghijklmnop");
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), "abcdefghijklmnop");
    }

    #[test]
    fn test_custom_separators() {
        let splitter = words(2, 0).with_separators(["|", ""]);
        assert_eq!(
            splitter.split_text("a b|c d|e"),
            vec!["a b|".to_string(), "c d|".to_string(), "e".to_string()]
        );
    }
}
