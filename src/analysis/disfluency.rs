use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    CategoryCounts, DisfluencyCategory, DisfluencyMark, FillerWordReport, WordTiming,
};

use super::timeline::TextAlignment;

/// Reasons a lexicon cannot be used for detection
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("repetitions are detected from word timings and cannot be listed in a lexicon")]
    AlgorithmicCategory,
    #[error("empty phrase in {0} lexicon")]
    EmptyPhrase(DisfluencyCategory),
    #[error("phrase {phrase:?} does not compile to a pattern: {source}")]
    InvalidPattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },
}

/// Literal phrases to flag, per disfluency category
///
/// Matching is case-insensitive and whole-word. Loaded from JSON as
/// `{"filler": ["um", ...], "hedge": ["you know", ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<DisfluencyCategory, Vec<String>>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::empty()
            .with_phrases(DisfluencyCategory::Filler, ["um", "uh", "er", "hmm"])
            .with_phrases(
                DisfluencyCategory::Hedge,
                [
                    "like",
                    "so",
                    "you know",
                    "i mean",
                    "actually",
                    "basically",
                    "just",
                    "kind of",
                    "sort of",
                ],
            )
    }
}

impl Lexicon {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add phrases under a category
    pub fn with_phrases<I, S>(mut self, category: DisfluencyCategory, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(category)
            .or_default()
            .extend(phrases.into_iter().map(Into::into));
        self
    }

    pub fn phrases(&self, category: DisfluencyCategory) -> &[String] {
        self.entries
            .get(&category)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    /// Validate the lexicon and build its match patterns
    pub fn compile(&self) -> Result<CompiledLexicon, LexiconError> {
        let mut patterns = Vec::new();
        let mut seen: BTreeMap<String, DisfluencyCategory> = BTreeMap::new();

        for (&category, phrases) in &self.entries {
            if category == DisfluencyCategory::Repetition {
                return Err(LexiconError::AlgorithmicCategory);
            }
            for phrase in phrases {
                let words: Vec<&str> = phrase.split_whitespace().collect();
                if words.is_empty() {
                    return Err(LexiconError::EmptyPhrase(category));
                }

                let key = words.join(" ").to_lowercase();
                if let Some(other) = seen.insert(key, category) {
                    if other != category {
                        warn!("Phrase {:?} is listed as both {} and {}", phrase, other, category);
                    }
                }

                let body = words
                    .iter()
                    .map(|w| regex::escape(w))
                    .collect::<Vec<_>>()
                    .join(r"\s+");
                let regex = Regex::new(&format!(r"(?i)\b{}\b", body)).map_err(|source| {
                    LexiconError::InvalidPattern {
                        phrase: phrase.clone(),
                        source,
                    }
                })?;

                patterns.push(LexiconPattern { category, regex });
            }
        }

        Ok(CompiledLexicon { patterns })
    }
}

#[derive(Debug, Clone)]
struct LexiconPattern {
    category: DisfluencyCategory,
    regex: Regex,
}

/// A lexicon ready for matching
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    patterns: Vec<LexiconPattern>,
}

impl CompiledLexicon {
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Find fillers, hedges and immediate repetitions
///
/// Every lexicon match is counted. A match is only listed as a mark when it
/// lines up with a word timing, since the mark needs a timestamp.
pub fn detect_disfluencies(
    text: &str,
    words: &[WordTiming],
    lexicon: &CompiledLexicon,
) -> FillerWordReport {
    let alignment = TextAlignment::build(text, words);
    let mut counts = CategoryCounts::default();
    let mut marks = Vec::new();
    let mut unaligned = 0usize;

    for pattern in &lexicon.patterns {
        for found in pattern.regex.find_iter(text) {
            counts.add(pattern.category);
            match alignment.timing_at(found.start()) {
                Some(idx) => marks.push(DisfluencyMark {
                    phrase: found.as_str().to_string(),
                    timestamp_sec: words[idx].start_time_sec,
                    category: pattern.category,
                }),
                None => unaligned += 1,
            }
        }
    }

    for mark in detect_repetitions(words) {
        counts.add(mark.category);
        marks.push(mark);
    }

    marks.sort_by(|a, b| a.timestamp_sec.total_cmp(&b.timestamp_sec));

    debug!(
        "Disfluencies: {} filler, {} hedge, {} repetition ({} without timestamp)",
        counts.filler, counts.hedge, counts.repetition, unaligned
    );

    FillerWordReport {
        count: counts.total(),
        counts,
        marks,
    }
}

/// Flag adjacent identical words, ignoring case and trailing punctuation
///
/// Single-character words are never flagged.
pub fn detect_repetitions(words: &[WordTiming]) -> Vec<DisfluencyMark> {
    words
        .windows(2)
        .filter_map(|pair| {
            let first = repetition_key(&pair[0].word);
            let second = repetition_key(&pair[1].word);
            if first == second && first.chars().count() > 1 {
                Some(DisfluencyMark {
                    phrase: format!("{} {}", pair[0].word, pair[1].word),
                    timestamp_sec: pair[0].start_time_sec,
                    category: DisfluencyCategory::Repetition,
                })
            } else {
                None
            }
        })
        .collect()
}

fn repetition_key(word: &str) -> String {
    word.trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_asr_json;

    fn default_lexicon() -> CompiledLexicon {
        Lexicon::default().compile().unwrap()
    }

    fn timed(text: &str, step: f64) -> Vec<WordTiming> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| WordTiming::new(w, i as f64 * step, i as f64 * step + step * 0.8))
            .collect()
    }

    #[test]
    fn test_detects_fillers_and_hedges() {
        let text = "Um, so, I think, um, this is, you know, good.";
        let words = timed(text, 0.5);

        let report = detect_disfluencies(text, &words, &default_lexicon());

        assert_eq!(report.counts.filler, 2);
        assert_eq!(report.counts.hedge, 2);
        assert_eq!(report.counts.repetition, 0);
        assert_eq!(report.count, 4);

        let phrases: Vec<&str> = report.marks.iter().map(|m| m.phrase.as_str()).collect();
        assert_eq!(phrases, vec!["Um", "so", "um", "you know"]);
        assert_eq!(report.marks[0].timestamp_sec, 0.0);
        assert_eq!(report.marks[1].category, DisfluencyCategory::Hedge);
        // "you" is the eighth word
        assert_eq!(report.marks[3].timestamp_sec, 7.0 * 0.5);
    }

    #[test]
    fn test_whole_word_matching() {
        let text = "Likely the summer was just fine";
        let words = timed(text, 0.4);

        let report = detect_disfluencies(text, &words, &default_lexicon());

        // "Likely" and "summer" contain lexicon words but are not matches
        assert_eq!(report.count, 1);
        assert_eq!(report.marks[0].phrase, "just");
    }

    #[test]
    fn test_unaligned_match_is_counted_not_listed() {
        let text = "um hello";
        let words = vec![WordTiming::new("hello", 0.0, 0.4)];

        let report = detect_disfluencies(text, &words, &default_lexicon());

        assert_eq!(report.counts.filler, 1);
        assert!(report.marks.is_empty());
    }

    #[test]
    fn test_repetition_detection() {
        let json = r#"{
            "transcript": "This is a test test of the system.",
            "confidence": 0.92,
            "words": [
                {"word": "This", "startTime": "0s", "endTime": "0.300s"},
                {"word": "is", "startTime": "0.300s", "endTime": "0.600s"},
                {"word": "a", "startTime": "0.600s", "endTime": "0.900s"},
                {"word": "test", "startTime": "0.900s", "endTime": "1.200s"},
                {"word": "test", "startTime": "1.200s", "endTime": "1.500s"},
                {"word": "of", "startTime": "1.500s", "endTime": "1.800s"},
                {"word": "the", "startTime": "1.800s", "endTime": "2.100s"},
                {"word": "system.", "startTime": "2.100s", "endTime": "2.400s"}
            ]
        }"#;
        let transcript = parse_asr_json(json).unwrap();

        let marks = detect_repetitions(&transcript.words);

        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].phrase, "test test");
        assert_eq!(marks[0].timestamp_sec, 0.9);
        assert_eq!(marks[0].category, DisfluencyCategory::Repetition);
    }

    #[test]
    fn test_repetition_ignores_single_letters_and_punctuation() {
        let words = vec![
            WordTiming::new("a", 0.0, 0.1),
            WordTiming::new("a", 0.2, 0.3),
            WordTiming::new("Really,", 0.4, 0.6),
            WordTiming::new("really", 0.7, 0.9),
        ];

        let marks = detect_repetitions(&words);

        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].phrase, "Really, really");
        assert_eq!(marks[0].timestamp_sec, 0.4);
    }

    #[test]
    fn test_repeated_filler_aligns_to_own_word() {
        let text = "well um okay um right";
        let words = timed(text, 1.0);

        let report = detect_disfluencies(text, &words, &default_lexicon());

        let stamps: Vec<f64> = report.marks.iter().map(|m| m.timestamp_sec).collect();
        assert_eq!(stamps, vec![1.0, 3.0]);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon::empty()
            .with_phrases(DisfluencyCategory::Filler, ["euh"])
            .with_phrases(DisfluencyCategory::Hedge, ["en fait"])
            .compile()
            .unwrap();
        let text = "Euh en   fait je pense";
        let words = timed(text, 0.5);

        let report = detect_disfluencies(text, &words, &lexicon);

        assert_eq!(report.counts.filler, 1);
        assert_eq!(report.counts.hedge, 1);
        assert_eq!(report.marks[1].phrase, "en   fait");
    }

    #[test]
    fn test_phrase_in_both_categories_counts_twice() {
        let lexicon = Lexicon::empty()
            .with_phrases(DisfluencyCategory::Filler, ["like"])
            .with_phrases(DisfluencyCategory::Hedge, ["like"])
            .compile()
            .unwrap();
        let text = "it was like fine";
        let words = timed(text, 0.5);

        let report = detect_disfluencies(text, &words, &lexicon);

        assert_eq!(report.counts.filler, 1);
        assert_eq!(report.counts.hedge, 1);
        assert_eq!(report.count, 2);
        assert_eq!(report.marks.len(), 2);
        let categories: Vec<_> = report.marks.iter().map(|m| m.category).collect();
        assert_eq!(
            categories,
            vec![DisfluencyCategory::Filler, DisfluencyCategory::Hedge]
        );
        assert!(report.marks.iter().all(|m| m.phrase == "like" && m.timestamp_sec == 1.0));
    }

    #[test]
    fn test_lexicon_rejects_repetition_category() {
        let lexicon = Lexicon::empty().with_phrases(DisfluencyCategory::Repetition, ["again"]);
        assert!(matches!(lexicon.compile(), Err(LexiconError::AlgorithmicCategory)));
    }

    #[test]
    fn test_lexicon_rejects_empty_phrase() {
        let lexicon = Lexicon::empty().with_phrases(DisfluencyCategory::Hedge, ["  "]);
        assert!(matches!(
            lexicon.compile(),
            Err(LexiconError::EmptyPhrase(DisfluencyCategory::Hedge))
        ));
    }

    #[test]
    fn test_lexicon_from_json() {
        let lexicon: Lexicon =
            serde_json::from_str(r#"{"filler": ["um"], "hedge": ["like", "sort of"]}"#).unwrap();

        assert_eq!(lexicon.phrases(DisfluencyCategory::Hedge).len(), 2);
        assert_eq!(lexicon.compile().unwrap().pattern_count(), 3);
    }
}
