use tracing::warn;

use crate::models::WordTiming;

/// Maximum number of word timings skipped when re-synchronizing text with timings
const RESYNC_LOOKAHEAD: usize = 3;

/// How far (in bytes) a text match may start past the beginning of its word
pub const ALIGN_BACKWARD_TOLERANCE: usize = 2;

/// Build the canonical word timeline from raw ASR word timings
///
/// Returns an owned copy ordered by start time. Entries with non-finite times
/// are dropped and inverted intervals are clamped to zero length. An empty
/// input yields an empty timeline.
pub fn normalize_words(words: &[WordTiming]) -> Vec<WordTiming> {
    let mut timeline: Vec<WordTiming> = Vec::with_capacity(words.len());
    let mut dropped = 0usize;
    let mut clamped = 0usize;

    for word in words {
        if !word.start_time_sec.is_finite() || !word.end_time_sec.is_finite() {
            dropped += 1;
            continue;
        }
        let mut word = word.clone();
        if word.end_time_sec < word.start_time_sec {
            word.end_time_sec = word.start_time_sec;
            clamped += 1;
        }
        timeline.push(word);
    }

    let ordered = timeline
        .windows(2)
        .all(|pair| pair[0].start_time_sec <= pair[1].start_time_sec);
    if !ordered {
        warn!("Word timings out of order, re-sorting by start time");
        timeline.sort_by(|a, b| a.start_time_sec.total_cmp(&b.start_time_sec));
    }
    if dropped > 0 {
        warn!("Dropped {} word timings with non-finite times", dropped);
    }
    if clamped > 0 {
        warn!("Clamped {} word timings that ended before they started", clamped);
    }

    timeline
}

/// Comparison key for matching transcript text against recognized words
///
/// Strips leading and trailing punctuation and lower-cases.
pub fn normalize_token(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// A whitespace-delimited token of the transcript text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextToken {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Index of the word timing this token was aligned to
    pub timing: Option<usize>,
}

/// Mapping from transcript text positions to word timings
///
/// Built by a single forward scan over the text with a cursor into the word
/// timings that only ever moves forward, so repeated identical words each
/// align with their own timing. A text token with no timing nearby is
/// anchored further ahead only when the following word agrees too.
#[derive(Debug, Clone, Default)]
pub struct TextAlignment {
    tokens: Vec<TextToken>,
}

impl TextAlignment {
    pub fn build(text: &str, words: &[WordTiming]) -> Self {
        let keys: Vec<String> = words.iter().map(|w| normalize_token(&w.word)).collect();
        let spans = token_spans(text);
        let text_keys: Vec<String> = spans.iter().map(|(_, raw)| normalize_token(raw)).collect();
        let mut tokens = Vec::with_capacity(spans.len());
        let mut cursor = 0usize;

        for (n, (start, raw)) in spans.iter().enumerate() {
            let key = &text_keys[n];
            let next_key = text_keys[n + 1..].iter().find(|k| !k.is_empty());
            let mut timing = None;

            if !key.is_empty() {
                if let Some(found) = find_timing(&keys, cursor, key, next_key) {
                    timing = Some(found);
                    cursor = found + 1;
                }
            }

            tokens.push(TextToken {
                start: *start,
                end: start + raw.len(),
                timing,
            });
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[TextToken] {
        &self.tokens
    }

    /// Number of text tokens that found a word timing
    pub fn aligned_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.timing.is_some()).count()
    }

    /// Word timing for the text token starting at (or just before) `offset`
    pub fn timing_at(&self, offset: usize) -> Option<usize> {
        let idx = self.tokens.partition_point(|t| t.start <= offset);
        let token = self.tokens.get(idx.checked_sub(1)?)?;
        if offset < token.end && offset - token.start <= ALIGN_BACKWARD_TOLERANCE {
            token.timing
        } else {
            None
        }
    }

    /// Word timings of all aligned tokens starting inside `start..end`
    pub fn timings_in(&self, start: usize, end: usize) -> Vec<usize> {
        let first = self.tokens.partition_point(|t| t.start < start);
        self.tokens[first..]
            .iter()
            .take_while(|t| t.start < end)
            .filter_map(|t| t.timing)
            .collect()
    }
}

/// Next word timing at or after `cursor` matching `key`
///
/// A match within the lookahead window is taken as is. Further ahead, the
/// following word timing must also match the next text token, so a common
/// word cannot pull the cursor far forward on its own.
fn find_timing(
    keys: &[String],
    cursor: usize,
    key: &str,
    next_key: Option<&String>,
) -> Option<usize> {
    let horizon = (cursor + RESYNC_LOOKAHEAD + 1).min(keys.len());
    if let Some(found) = (cursor..horizon).find(|&i| keys[i] == key) {
        return Some(found);
    }

    (horizon..keys.len()).find(|&i| {
        keys[i] == key
            && match next_key {
                Some(next) => keys.get(i + 1) == Some(next),
                None => true,
            }
    })
}

/// Byte offsets and slices of whitespace-separated tokens
fn token_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut token_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), token_start) {
            (true, Some(start)) => {
                spans.push((start, &text[start..i]));
                token_start = None;
            }
            (false, None) => token_start = Some(i),
            _ => {}
        }
    }
    if let Some(start) = token_start {
        spans.push((start, &text[start..]));
    }

    spans
}
