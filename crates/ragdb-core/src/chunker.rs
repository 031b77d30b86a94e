//! Boundary-aware character chunking with overlap.
//!
//! Windows are measured in characters, not bytes, so multi-byte text never
//! gets split inside a code point.

use std::ops::Range;

use crate::error::{Error, Result};

const BREAK_CHARS: [char; 4] = ['.', '!', '?', ' '];

/// Character span `[start, end)` of one emitted window.
pub type ChunkSpan = Range<usize>;

fn validate(chunk_size: usize, overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidConfiguration("chunk_size must be greater than zero".to_string()));
    }
    if overlap >= chunk_size {
        return Err(Error::InvalidConfiguration(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Splits `text` into overlapping windows and returns their character spans,
/// including windows that are only whitespace.
///
/// Every span starts strictly after the previous one and never later than
/// the previous span's end, so the spans cover the whole text without gaps.
pub fn chunk_spans(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<ChunkSpan>> {
    validate(chunk_size, overlap)?;
    let chars: Vec<char> = text.chars().collect();
    Ok(spans_over(&chars, chunk_size, overlap))
}

fn spans_over(chars: &[char], chunk_size: usize, overlap: usize) -> Vec<ChunkSpan> {
    let len = chars.len();
    let mut spans = Vec::new();
    let mut start = 0usize;

    while start < len {
        let window_end = start + chunk_size;
        if window_end >= len {
            spans.push(start..len);
            break;
        }

        let window = &chars[start..window_end];
        let break_at = window.iter().rposition(|c| BREAK_CHARS.contains(c));
        let end = match break_at {
            Some(pos) if pos > chunk_size / 2 => start + pos + 1,
            _ => window_end,
        };
        spans.push(start..end);

        // Overlapping back from a short boundary window can land at or
        // before `start`; drop the overlap for that step instead.
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    spans
}

/// Splits `text` into overlapping, boundary-aware chunks.
///
/// Blank chunks are dropped. Empty input yields no chunks.
pub fn chunk(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    validate(chunk_size, overlap)?;
    let chars: Vec<char> = text.chars().collect();
    Ok(spans_over(&chars, chunk_size, overlap)
        .into_iter()
        .map(|span| chars[span].iter().collect::<String>())
        .filter(|piece| !piece.trim().is_empty())
        .collect())
}
