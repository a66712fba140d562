use serde::{Deserialize, Serialize};

use super::{AsrResponse, AsrWord};

/// A recognized word with its position on the audio timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTiming {
    /// The word as recognized, possibly carrying punctuation
    pub word: String,
    /// Start timestamp in seconds
    pub start_time_sec: f64,
    /// End timestamp in seconds
    pub end_time_sec: f64,
    /// Per-word recognition confidence (0-1), if the recognizer reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl WordTiming {
    pub fn new(word: impl Into<String>, start_time_sec: f64, end_time_sec: f64) -> Self {
        Self {
            word: word.into(),
            start_time_sec,
            end_time_sec,
            confidence: None,
        }
    }

    /// Create a word timing from an ASR word
    pub fn from_asr(word: &AsrWord) -> Self {
        Self {
            word: word.word.clone(),
            start_time_sec: word.start_time,
            end_time_sec: word.end_time,
            confidence: word.confidence,
        }
    }

    /// Duration of this word in seconds, never negative
    pub fn duration_sec(&self) -> f64 {
        (self.end_time_sec - self.start_time_sec).max(0.0)
    }
}

/// A completed transcription handed to the metrics engine
///
/// The engine only ever borrows a transcript; every derived report is a
/// fresh value computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full recognized text
    pub text: String,
    /// Overall recognition confidence (0-1)
    pub confidence: f64,
    /// Word timings ordered by start time
    pub words: Vec<WordTiming>,
}

impl Transcript {
    pub fn new(text: impl Into<String>, confidence: f64, words: Vec<WordTiming>) -> Self {
        Self {
            text: text.into(),
            confidence,
            words,
        }
    }

    /// Build a transcript from a completed ASR response
    pub fn from_asr(response: &AsrResponse) -> Self {
        let confidence = if response.confidence.is_finite() {
            response.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            text: response.transcript.clone(),
            confidence,
            words: response.words.iter().map(WordTiming::from_asr).collect(),
        }
    }

    /// Number of word timings
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Span from the first word's start to the last word's end, in seconds
    pub fn duration_sec(&self) -> f64 {
        match (self.words.first(), self.words.last()) {
            (Some(first), Some(last)) => (last.end_time_sec - first.start_time_sec).max(0.0),
            _ => 0.0,
        }
    }
}
