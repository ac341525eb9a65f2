//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`TextChunker`], a
//! fixed-size sliding-window splitter with configurable overlap. Chunking
//! is deliberately boundary-unaware (chunks may split words): a simplicity
//! and latency tradeoff, not a defect.

use crate::error::{RagError, Result};

/// A strategy for splitting extracted document text into chunks.
///
/// Implementations are pure functions over the input text: re-running on
/// the same input yields the same chunks.
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Returns an empty `Vec` for empty text.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into fixed-size chunks by character count with overlap.
///
/// Window `i` spans `chunk_size` characters; the next window starts
/// `chunk_size - chunk_overlap` characters later. Windows are indexed by
/// character, not byte, so multi-byte code points are never split.
///
/// # Example
///
/// ```rust,ignore
/// use flowstack_rag::TextChunker;
///
/// let chunker = TextChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&extracted_text);
/// ```
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new `TextChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size` (the window would never advance).
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Default for TextChunker {
    /// The default window: 1000 characters with 200 characters of overlap.
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200 }
    }
}

impl Chunker for TextChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        // Invariant from the constructor: step >= 1, so the loop terminates.
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            start += step;
        }

        chunks
    }
}
