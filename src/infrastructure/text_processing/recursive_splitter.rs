use std::collections::VecDeque;

use thiserror::Error;

use crate::application::ports::TextSplitter;

#[derive(Debug, Error, PartialEq)]
pub enum SplitterConfigError {
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error("Chunk overlap ({overlap}) is larger than chunk size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },
}

/// Recursive character splitter with overlapping windows.
///
/// Text is cut on the coarsest separator present (paragraphs, then lines,
/// then words, then characters). Separators stay attached to the start of the
/// following piece, pieces are merged greedily up to `chunk_size` characters,
/// and each new chunk re-uses up to `chunk_overlap` characters from the end of
/// the previous one. Chunks are whitespace-trimmed and never empty.
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, SplitterConfigError> {
        if chunk_size == 0 {
            return Err(SplitterConfigError::ZeroChunkSize);
        }
        if chunk_overlap > chunk_size {
            return Err(SplitterConfigError::OverlapTooLarge {
                overlap: chunk_overlap,
                size: chunk_size,
            });
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: vec![
                "\n\n", // paragraphs
                "\n",   // lines
                " ",    // words
                "",     // characters
            ],
        })
    }

    fn split_recursive(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        let mut separator = separators.last().copied().unwrap_or("");
        let mut remaining: &[&'static str] = &[];
        for (i, &candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if remaining.is_empty() {
                final_chunks.push(piece);
            } else {
                final_chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Greedy merge of small pieces into windows. Separators are already part
    /// of the pieces, so pieces are concatenated directly.
    fn merge_splits(&self, splits: &[String]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let len = char_len(split);

            if total + len > self.chunk_size && !current.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if let Some(doc) = join_pieces(&current) {
                    docs.push(doc);
                }

                // shrink to the overlap window, and until the next piece fits
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match current.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            current.push_back(split);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }

        docs
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits on `separator`, prefixing every piece after the first with it.
/// An empty separator splits into single characters. Empty pieces are dropped.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();

    if let Some(first) = parts.next() {
        if !first.is_empty() {
            pieces.push(first.to_string());
        }
    }
    for part in parts {
        pieces.push(format!("{}{}", separator, part));
    }

    pieces
}
