//! Property tests for the sliding-window chunker.

use flowstack_rag::chunking::{Chunker, TextChunker};
use proptest::prelude::*;

/// **Property: chunk count and coverage.**
/// *For any* text of length L chunked with `size` and `overlap < size`,
/// the number of chunks SHALL equal `ceil(L / (size - overlap))`, every
/// character position SHALL appear in at least one chunk, and re-running
/// SHALL produce identical output.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn count_matches_formula_and_every_char_is_covered(
            text in "[a-zA-Z0-9 .,!?éü\u{1F600}]{0,400}",
            size in 1usize..64,
            overlap_frac in 0usize..64,
        ) {
            let overlap = overlap_frac % size;
            let chunker = TextChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text);

            let len = text.chars().count();
            let step = size - overlap;
            let expected = len.div_ceil(step);
            prop_assert_eq!(chunks.len(), expected);

            // Every character position appears in at least one chunk:
            // window i covers [i*step, i*step + size).
            let chars: Vec<char> = text.chars().collect();
            for (i, chunk) in chunks.iter().enumerate() {
                let start = i * step;
                let end = (start + size).min(len);
                let expected_window: String = chars[start..end].iter().collect();
                prop_assert_eq!(chunk, &expected_window);
            }
            if let Some(last) = chunks.last() {
                let last_start = (chunks.len() - 1) * step;
                prop_assert!(last_start + last.chars().count() >= len);
            }
        }

        #[test]
        fn chunking_is_pure(
            text in "[a-z ]{0,200}",
            size in 1usize..32,
        ) {
            let chunker = TextChunker::new(size, size / 2).unwrap();
            prop_assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
        }
    }
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunker = TextChunker::default();
    assert!(chunker.chunk("").is_empty());
}

#[test]
fn default_window_is_1000_by_200() {
    let chunker = TextChunker::default();
    let text = "a".repeat(2500);
    let chunks = chunker.chunk(&text);
    // step 800: windows at 0, 800, 1600, 2400
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[0].len(), 1000);
    assert_eq!(chunks[3].len(), 100);
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunker = TextChunker::default();
    let chunks = chunker.chunk("hello world");
    assert_eq!(chunks, vec!["hello world".to_string()]);
}
