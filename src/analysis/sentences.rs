use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{Sentence, SentenceReport, WordTiming};

use super::rate::words_per_minute;
use super::timeline::TextAlignment;

/// A run of text closed by terminal punctuation
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

/// Split the transcript into sentences and place each on the timeline
///
/// Returns `None` when there is no text or no word timings. Text after the
/// last terminal punctuation mark is not a sentence. Without any terminal
/// punctuation the whole transcript is one sentence. Sentences that align
/// with no word timing are dropped.
pub fn segment_sentences(text: &str, words: &[WordTiming]) -> Option<SentenceReport> {
    if text.trim().is_empty() || words.is_empty() {
        return None;
    }

    let matches: Vec<_> = SENTENCE_PATTERN.find_iter(text).collect();

    let sentences = if matches.is_empty() {
        let first = words.first()?;
        let last = words.last()?;
        vec![build_sentence(
            text,
            first.start_time_sec,
            last.end_time_sec,
            words.len(),
        )]
    } else {
        let alignment = TextAlignment::build(text, words);
        matches
            .iter()
            .filter_map(|m| {
                let members = alignment.timings_in(m.start(), m.end());
                let first = words.get(*members.first()?)?;
                let last = words.get(*members.last()?)?;
                Some(build_sentence(
                    m.as_str(),
                    first.start_time_sec,
                    last.end_time_sec,
                    members.len(),
                ))
            })
            .collect::<Vec<_>>()
    };

    let total_words: usize = sentences.iter().map(|s| s.word_count).sum();
    let average_sentence_length_words = if sentences.is_empty() {
        0.0
    } else {
        total_words as f64 / sentences.len() as f64
    };

    debug!(
        "Sentences: {} kept, avg {:.1} words",
        sentences.len(),
        average_sentence_length_words
    );

    Some(SentenceReport {
        sentences,
        average_sentence_length_words,
    })
}

fn build_sentence(text: &str, start_time_sec: f64, end_time_sec: f64, word_count: usize) -> Sentence {
    Sentence {
        text: text.trim().to_string(),
        start_time_sec,
        end_time_sec,
        word_count,
        words_per_minute: words_per_minute(word_count, end_time_sec - start_time_sec),
    }
}
