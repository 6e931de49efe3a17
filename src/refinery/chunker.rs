// * Sliding Window Chunker
// * Character-budgeted chunking that packs whole newline-delimited segments,
// * so windows break on line boundaries rather than mid-sentence.

use crate::config::constants::{CHUNK_OVERLAP, CHUNK_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Represents a text chunk with metadata
///
/// `start_index`/`end_index` are a half-open range over the newline-delimited
/// segments of the source text, so consecutive chunks with overlapping ranges
/// share whole segments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextChunk {
    pub content: String,
    pub char_count: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub chunk_index: usize,
}

/// Configuration for the sliding window chunker
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Maximum characters per chunk, separators included (default: 1000)
    pub window_size: usize,
    /// Character budget for segments carried over between chunks (default: 200)
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            window_size: CHUNK_WINDOW_SIZE,
            overlap: CHUNK_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    /// Creates a new config with specified window size
    /// Overlap is calculated as 20% of window size
    pub fn with_window_size(window_size: usize) -> Self {
        Self {
            window_size,
            overlap: window_size / 5,
        }
    }

    /// Creates a new config with explicit window and overlap
    pub fn new(window_size: usize, overlap: usize) -> Self {
        Self {
            window_size,
            overlap,
        }
    }
}

/// Sliding window text chunker over newline-delimited segments
///
/// Characters are counted as Unicode grapheme clusters. Segments are packed
/// greedily until the window budget is hit; the trailing segments whose total
/// fits the overlap budget are carried into the next window. A single segment
/// longer than the window cannot be split further and becomes its own
/// oversized chunk.
pub struct SlidingWindowChunker {
    config: ChunkerConfig,
}

impl SlidingWindowChunker {
    /// Creates a new chunker with default configuration
    /// Default: window=1000 characters, overlap=200 characters
    pub fn new() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }

    /// Creates a new chunker with custom configuration
    pub fn with_config(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Chunks text into overlapping character windows split on newlines
    ///
    /// # Arguments
    /// * `text` - The input text to chunk
    ///
    /// # Returns
    /// Vector of text chunks with metadata; empty input yields no chunks
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // * If the whole text fits in a single window, return it as-is
        let total_chars = grapheme_len(text);
        let segments: Vec<&str> = text.split('\n').collect();
        if total_chars <= self.config.window_size {
            return vec![TextChunk {
                content: text.to_string(),
                char_count: total_chars,
                start_index: 0,
                end_index: segments.len(),
                chunk_index: 0,
            }];
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        // * (segment index, segment text, segment length in graphemes)
        let mut window: Vec<(usize, &str, usize)> = Vec::new();

        for (i, seg) in segments.iter().enumerate() {
            let seg_len = grapheme_len(seg);
            let projected = if window.is_empty() {
                seg_len
            } else {
                window_len(&window) + 1 + seg_len
            };

            if projected > self.config.window_size && !window.is_empty() {
                chunks.push(build_chunk(&window, chunks.len()));

                // * Carry over trailing segments within the overlap budget that
                // * still leave room for the incoming segment
                while !window.is_empty()
                    && (window_len(&window) > self.config.overlap
                        || window_len(&window) + 1 + seg_len > self.config.window_size)
                {
                    window.remove(0);
                }
            }

            window.push((i, seg, seg_len));
        }

        // * The final window always holds at least the last segment
        if !window.is_empty() {
            chunks.push(build_chunk(&window, chunks.len()));
        }

        chunks
    }

    /// Chunks text and returns only the content strings (simplified API)
    pub fn chunk_simple(&self, text: &str) -> Vec<String> {
        self.chunk(text).into_iter().map(|c| c.content).collect()
    }

    /// Returns the current configuration
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }
}

impl Default for SlidingWindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

// * Window length in characters, counting one separator between segments
fn window_len(window: &[(usize, &str, usize)]) -> usize {
    if window.is_empty() {
        return 0;
    }
    window.iter().map(|(_, _, len)| len).sum::<usize>() + window.len() - 1
}

fn build_chunk(window: &[(usize, &str, usize)], chunk_index: usize) -> TextChunk {
    let content = window
        .iter()
        .map(|(_, seg, _)| *seg)
        .collect::<Vec<_>>()
        .join("\n");

    TextChunk {
        char_count: window_len(window),
        start_index: window.first().map(|(i, _, _)| *i).unwrap_or(0),
        end_index: window.last().map(|(i, _, _)| i + 1).unwrap_or(0),
        chunk_index,
        content,
    }
}

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Utility function for quick chunking with default settings
pub fn chunk_text(text: &str) -> Vec<String> {
    SlidingWindowChunker::new().chunk_simple(text)
}

/// Utility function for quick chunking with custom window size
pub fn chunk_text_with_window(text: &str, window_size: usize) -> Vec<String> {
    let config = ChunkerConfig::with_window_size(window_size);
    SlidingWindowChunker::with_config(config).chunk_simple(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(count: usize, width: usize) -> String {
        (0..count)
            .map(|i| {
                let fill = char::from(b'a' + (i % 26) as u8);
                std::iter::repeat(fill).take(width).collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunker = SlidingWindowChunker::new();
        let text = "This is a small piece of text that fits in one chunk.";

        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, text);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = SlidingWindowChunker::new();
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_windows_break_on_newlines() {
        let config = ChunkerConfig::new(10, 4);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = "aaa\nbbb\nccc\nddd";

        let chunks = chunker.chunk(&text);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["aaa\nbbb", "bbb\nccc", "ccc\nddd"]);
    }

    #[test]
    fn test_overlap_carries_trailing_segments() {
        let config = ChunkerConfig::new(10, 4);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = "aaa\nbbb\nccc\nddd";

        let chunks = chunker.chunk(&text);

        // * Each chunk re-starts at the previous chunk's last segment
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start_index, pair[0].end_index - 1);
        }
    }

    #[test]
    fn test_segment_spans_reconstruct_original() {
        let config = ChunkerConfig::new(250, 50);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = lines(12, 60);
        let segments: Vec<&str> = text.split('\n').collect();

        let chunks = chunker.chunk(&text);

        assert!(chunks.len() > 1);
        let mut covered = 0;
        let mut rebuilt: Vec<&str> = Vec::new();
        for chunk in &chunks {
            // * Content is exactly the joined segment range
            let expected = segments[chunk.start_index..chunk.end_index].join("\n");
            assert_eq!(chunk.content, expected);
            assert!(chunk.start_index <= covered, "Gap between chunks");
            rebuilt.extend(&segments[covered.max(chunk.start_index)..chunk.end_index]);
            covered = chunk.end_index;
        }
        assert_eq!(covered, segments.len());
        assert_eq!(rebuilt.join("\n"), text);
    }

    #[test]
    fn test_oversized_segment_becomes_own_chunk() {
        let config = ChunkerConfig::new(10, 3);
        let chunker = SlidingWindowChunker::with_config(config);
        let long = "y".repeat(30);
        let text = format!("aa\n{}\nbb", long);

        let chunks = chunker.chunk(&text);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["aa", long.as_str(), "bb"]);
    }

    #[test]
    fn test_unsplittable_text_is_one_oversized_chunk() {
        let config = ChunkerConfig::new(10, 3);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = "x".repeat(50);

        let chunks = chunker.chunk(&text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count, 50);
    }

    #[test]
    fn test_grapheme_counting() {
        let chunker = SlidingWindowChunker::new();
        // * Family emoji is one grapheme cluster but many code points
        let text = "caf\u{e9} \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";

        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count, 6);
    }

    #[test]
    fn test_chunk_simple() {
        let config = ChunkerConfig::new(10, 4);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = "aaa\nbbb\nccc\nddd";

        let simple_chunks = chunker.chunk_simple(&text);
        let detailed_chunks = chunker.chunk(&text);

        assert_eq!(simple_chunks.len(), detailed_chunks.len());
        for (simple, detailed) in simple_chunks.iter().zip(detailed_chunks.iter()) {
            assert_eq!(simple, &detailed.content);
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = ChunkerConfig::default();

        assert_eq!(config.window_size, CHUNK_WINDOW_SIZE);
        assert_eq!(config.overlap, CHUNK_OVERLAP);
    }

    #[test]
    fn test_utility_functions() {
        let text = lines(4, 3);

        let default_chunks = chunk_text(&text);
        let custom_chunks = chunk_text_with_window(&text, 8);

        assert_eq!(default_chunks.len(), 1);
        assert!(custom_chunks.len() >= 2);
    }

    #[test]
    fn test_blank_segments_are_preserved() {
        let config = ChunkerConfig::new(8, 2);
        let chunker = SlidingWindowChunker::with_config(config);
        let text = "aaa\n\nbbb\nccc\nddd";

        let chunks = chunker.chunk(&text);

        let joined: String = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("|");
        // * The empty segment travels with its neighbors
        assert!(joined.contains("aaa\n\nbbb") || joined.contains("\nbbb"));
    }
}
