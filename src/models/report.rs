use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of disfluency a mark was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisfluencyCategory {
    /// Minimal-content sounds ("um", "uh")
    Filler,
    /// Content-bearing words that diminish confidence ("like", "sort of")
    Hedge,
    /// The same word spoken twice in a row
    Repetition,
}

impl fmt::Display for DisfluencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisfluencyCategory::Filler => write!(f, "filler"),
            DisfluencyCategory::Hedge => write!(f, "hedge"),
            DisfluencyCategory::Repetition => write!(f, "repetition"),
        }
    }
}

/// A single detected disfluency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisfluencyMark {
    /// Text exactly as it appeared in the transcript
    pub phrase: String,
    /// Start time of the first word of the phrase, in seconds
    pub timestamp_sec: f64,
    pub category: DisfluencyCategory,
}

/// Occurrence counts per category, including matches that could not be timestamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub filler: usize,
    pub hedge: usize,
    pub repetition: usize,
}

impl CategoryCounts {
    pub fn add(&mut self, category: DisfluencyCategory) {
        match category {
            DisfluencyCategory::Filler => self.filler += 1,
            DisfluencyCategory::Hedge => self.hedge += 1,
            DisfluencyCategory::Repetition => self.repetition += 1,
        }
    }

    pub fn get(&self, category: DisfluencyCategory) -> usize {
        match category {
            DisfluencyCategory::Filler => self.filler,
            DisfluencyCategory::Hedge => self.hedge,
            DisfluencyCategory::Repetition => self.repetition,
        }
    }

    pub fn total(&self) -> usize {
        self.filler + self.hedge + self.repetition
    }
}

/// Disfluency detection output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillerWordReport {
    /// Every occurrence found, timestamped or not
    pub count: usize,
    pub counts: CategoryCounts,
    /// Timestamped occurrences, ordered by timestamp
    pub marks: Vec<DisfluencyMark>,
}

/// A silence between two consecutive words
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pause {
    /// End of the word preceding the silence, in seconds
    pub start_time_sec: f64,
    pub duration_sec: f64,
}

/// Aggregate pause statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseReport {
    pub total_pauses: usize,
    pub long_pauses: usize,
    pub avg_pause_duration_sec: f64,
    pub pauses: Vec<Pause>,
}

/// A sentence mapped onto the audio timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub text: String,
    pub start_time_sec: f64,
    pub end_time_sec: f64,
    /// Number of word timings aligned to this sentence
    pub word_count: usize,
    /// Unset when the sentence has no positive duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_per_minute: Option<u32>,
}

/// Sentence segmentation output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceReport {
    pub sentences: Vec<Sentence>,
    pub average_sentence_length_words: f64,
}

impl SentenceReport {
    /// Ratio of the fastest to the slowest sentence pace
    ///
    /// Requires at least two sentences with a computed, non-zero rate.
    pub fn pacing_ratio(&self) -> Option<f64> {
        let rates: Vec<u32> = self
            .sentences
            .iter()
            .filter_map(|s| s.words_per_minute)
            .filter(|&wpm| wpm > 0)
            .collect();
        if rates.len() < 2 {
            return None;
        }
        let max = rates.iter().copied().max()?;
        let min = rates.iter().copied().min()?;
        Some(max as f64 / min as f64)
    }
}
