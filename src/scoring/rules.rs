use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::CategoryCounts;

/// Score every transcript starts from before deductions
pub const BASELINE: u32 = 85;

/// Transcripts longer than this (seconds) are expected to contain pauses
const PAUSE_RATE_MIN_DURATION_SEC: f64 = 30.0;
/// Fewer pauses per minute than this signals rushing
const PAUSE_RATE_MIN_PER_MINUTE: f64 = 2.0;

/// Everything the clarity rules look at
///
/// Signals are `None` when the sub-analysis that produces them was not
/// possible; rules over a missing signal deduct nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringSignals {
    pub word_count: usize,
    pub duration_sec: f64,
    pub confidence: f64,
    pub speaking_rate: Option<u32>,
    pub disfluencies: Option<CategoryCounts>,
    pub total_pauses: Option<usize>,
    pub long_pauses: Option<usize>,
    pub avg_pause_duration_sec: Option<f64>,
    pub average_sentence_length: Option<f64>,
    pub pacing_ratio: Option<f64>,
}

impl ScoringSignals {
    /// Percentage of words that are fillers or hedges
    pub fn disfluency_density_pct(&self) -> Option<f64> {
        let counts = self.disfluencies?;
        self.percent_of_words(counts.filler + counts.hedge)
    }

    /// Percentage of words that are hedges
    pub fn hedge_density_pct(&self) -> Option<f64> {
        let counts = self.disfluencies?;
        self.percent_of_words(counts.hedge)
    }

    /// Pauses per minute of speech
    pub fn pauses_per_minute(&self) -> Option<f64> {
        let total = self.total_pauses?;
        if self.duration_sec <= 0.0 {
            return None;
        }
        Some(total as f64 / (self.duration_sec / 60.0))
    }

    fn percent_of_words(&self, count: usize) -> Option<f64> {
        if self.word_count == 0 {
            return None;
        }
        Some(count as f64 / self.word_count as f64 * 100.0)
    }
}

/// A single, independently evaluated clarity deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionRule {
    /// Fillers and hedges as a share of all words
    DisfluencyDensity,
    /// Hedges alone, on top of the combined density
    HedgeDensity,
    /// Immediate word repetitions
    Repetitions,
    /// Number of pauses longer than the long-pause threshold
    LongPauses,
    /// Mean pause length
    AveragePauseDuration,
    /// Long recordings with almost no pauses read as rushed
    SparsePauses,
    /// Overall words per minute outside the comfortable range
    SpeakingRate,
    /// Low recognition confidence usually means unclear articulation
    RecognitionConfidence,
    /// Long sentences are hard to follow
    SentenceLength,
    /// Fastest sentence much faster than the slowest
    PacingVariance,
}

impl DeductionRule {
    pub const ALL: [DeductionRule; 10] = [
        DeductionRule::DisfluencyDensity,
        DeductionRule::HedgeDensity,
        DeductionRule::Repetitions,
        DeductionRule::LongPauses,
        DeductionRule::AveragePauseDuration,
        DeductionRule::SparsePauses,
        DeductionRule::SpeakingRate,
        DeductionRule::RecognitionConfidence,
        DeductionRule::SentenceLength,
        DeductionRule::PacingVariance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DeductionRule::DisfluencyDensity => "disfluency_density",
            DeductionRule::HedgeDensity => "hedge_density",
            DeductionRule::Repetitions => "repetitions",
            DeductionRule::LongPauses => "long_pauses",
            DeductionRule::AveragePauseDuration => "average_pause_duration",
            DeductionRule::SparsePauses => "sparse_pauses",
            DeductionRule::SpeakingRate => "speaking_rate",
            DeductionRule::RecognitionConfidence => "recognition_confidence",
            DeductionRule::SentenceLength => "sentence_length",
            DeductionRule::PacingVariance => "pacing_variance",
        }
    }

    /// Points this rule takes off the baseline
    pub fn evaluate(&self, signals: &ScoringSignals) -> u32 {
        match self {
            DeductionRule::DisfluencyDensity => signals
                .disfluency_density_pct()
                .map_or(0, |pct| above(pct, &[(15.0, 25), (10.0, 15), (5.0, 10), (2.0, 5)])),
            DeductionRule::HedgeDensity => signals
                .hedge_density_pct()
                .map_or(0, |pct| above(pct, &[(8.0, 10), (5.0, 5)])),
            DeductionRule::Repetitions => signals
                .disfluencies
                .map_or(0, |c| above(c.repetition as f64, &[(3.0, 10), (1.0, 5)])),
            DeductionRule::LongPauses => signals
                .long_pauses
                .map_or(0, |n| above(n as f64, &[(5.0, 15), (2.0, 8)])),
            DeductionRule::AveragePauseDuration => signals
                .avg_pause_duration_sec
                .map_or(0, |avg| above(avg, &[(3.0, 12), (2.0, 8)])),
            DeductionRule::SparsePauses => match signals.pauses_per_minute() {
                Some(rate)
                    if signals.duration_sec > PAUSE_RATE_MIN_DURATION_SEC
                        && rate < PAUSE_RATE_MIN_PER_MINUTE =>
                {
                    10
                }
                _ => 0,
            },
            DeductionRule::SpeakingRate => signals.speaking_rate.map_or(0, |wpm| {
                let wpm = wpm as f64;
                match above(wpm, &[(200.0, 20), (180.0, 10)]) {
                    0 => below(wpm, &[(100.0, 15), (120.0, 5)]),
                    points => points,
                }
            }),
            DeductionRule::RecognitionConfidence => {
                below(signals.confidence, &[(0.70, 10), (0.85, 5)])
            }
            DeductionRule::SentenceLength => signals
                .average_sentence_length
                .map_or(0, |len| above(len, &[(30.0, 10), (20.0, 5)])),
            DeductionRule::PacingVariance => signals
                .pacing_ratio
                .map_or(0, |ratio| above(ratio, &[(2.0, 10), (1.5, 5)])),
        }
    }
}

impl fmt::Display for DeductionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points for the first tier whose threshold `value` exceeds
///
/// Tiers are ordered from the highest threshold down.
fn above(value: f64, tiers: &[(f64, u32)]) -> u32 {
    tiers
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map_or(0, |&(_, points)| points)
}

/// Points for the first tier whose threshold `value` falls under
///
/// Tiers are ordered from the lowest threshold up.
fn below(value: f64, tiers: &[(f64, u32)]) -> u32 {
    tiers
        .iter()
        .find(|(threshold, _)| value < *threshold)
        .map_or(0, |&(_, points)| points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> ScoringSignals {
        ScoringSignals {
            word_count: 100,
            duration_sec: 40.0,
            confidence: 0.95,
            ..Default::default()
        }
    }

    fn counts(filler: usize, hedge: usize, repetition: usize) -> Option<CategoryCounts> {
        Some(CategoryCounts {
            filler,
            hedge,
            repetition,
        })
    }

    #[test]
    fn test_tiers() {
        let tiers = [(15.0, 25), (10.0, 15), (5.0, 10), (2.0, 5)];
        assert_eq!(above(16.0, &tiers), 25);
        assert_eq!(above(15.0, &tiers), 15);
        assert_eq!(above(2.5, &tiers), 5);
        assert_eq!(above(2.0, &tiers), 0);
        assert_eq!(below(0.5, &[(0.70, 10), (0.85, 5)]), 10);
        assert_eq!(below(0.8, &[(0.70, 10), (0.85, 5)]), 5);
        assert_eq!(below(0.85, &[(0.70, 10), (0.85, 5)]), 0);
    }

    #[test]
    fn test_disfluency_density() {
        let mut s = signals();
        s.disfluencies = counts(10, 6, 0);
        assert_eq!(DeductionRule::DisfluencyDensity.evaluate(&s), 25);

        s.disfluencies = counts(3, 0, 0);
        assert_eq!(DeductionRule::DisfluencyDensity.evaluate(&s), 5);

        s.disfluencies = None;
        assert_eq!(DeductionRule::DisfluencyDensity.evaluate(&s), 0);
    }

    #[test]
    fn test_hedge_density() {
        let mut s = signals();
        s.disfluencies = counts(0, 9, 0);
        assert_eq!(DeductionRule::HedgeDensity.evaluate(&s), 10);

        s.disfluencies = counts(20, 6, 0);
        assert_eq!(DeductionRule::HedgeDensity.evaluate(&s), 5);
    }

    #[test]
    fn test_repetitions() {
        let mut s = signals();
        s.disfluencies = counts(0, 0, 1);
        assert_eq!(DeductionRule::Repetitions.evaluate(&s), 0);
        s.disfluencies = counts(0, 0, 2);
        assert_eq!(DeductionRule::Repetitions.evaluate(&s), 5);
        s.disfluencies = counts(0, 0, 4);
        assert_eq!(DeductionRule::Repetitions.evaluate(&s), 10);
    }

    #[test]
    fn test_pause_rules() {
        let mut s = signals();
        s.total_pauses = Some(8);
        s.long_pauses = Some(6);
        s.avg_pause_duration_sec = Some(3.5);
        assert_eq!(DeductionRule::LongPauses.evaluate(&s), 15);
        assert_eq!(DeductionRule::AveragePauseDuration.evaluate(&s), 12);
        assert_eq!(DeductionRule::SparsePauses.evaluate(&s), 0);

        s.long_pauses = Some(3);
        s.avg_pause_duration_sec = Some(2.5);
        assert_eq!(DeductionRule::LongPauses.evaluate(&s), 8);
        assert_eq!(DeductionRule::AveragePauseDuration.evaluate(&s), 8);
    }

    #[test]
    fn test_sparse_pauses() {
        let mut s = signals();
        // One pause in 40 seconds is 1.5 per minute
        s.total_pauses = Some(1);
        assert_eq!(DeductionRule::SparsePauses.evaluate(&s), 10);

        s.duration_sec = 25.0;
        assert_eq!(DeductionRule::SparsePauses.evaluate(&s), 0);

        s.duration_sec = 40.0;
        s.total_pauses = None;
        assert_eq!(DeductionRule::SparsePauses.evaluate(&s), 0);
    }

    #[test]
    fn test_speaking_rate() {
        let mut s = signals();
        let cases = [(225, 20), (190, 10), (150, 0), (110, 5), (90, 15), (200, 10), (120, 0)];
        for (wpm, expected) in cases {
            s.speaking_rate = Some(wpm);
            assert_eq!(DeductionRule::SpeakingRate.evaluate(&s), expected, "wpm {}", wpm);
        }
        s.speaking_rate = None;
        assert_eq!(DeductionRule::SpeakingRate.evaluate(&s), 0);
    }

    #[test]
    fn test_confidence() {
        let mut s = signals();
        s.confidence = 0.65;
        assert_eq!(DeductionRule::RecognitionConfidence.evaluate(&s), 10);
        s.confidence = 0.8;
        assert_eq!(DeductionRule::RecognitionConfidence.evaluate(&s), 5);
    }

    #[test]
    fn test_sentence_rules() {
        let mut s = signals();
        s.average_sentence_length = Some(31.0);
        s.pacing_ratio = Some(2.5);
        assert_eq!(DeductionRule::SentenceLength.evaluate(&s), 10);
        assert_eq!(DeductionRule::PacingVariance.evaluate(&s), 10);

        s.average_sentence_length = Some(21.0);
        s.pacing_ratio = Some(1.6);
        assert_eq!(DeductionRule::SentenceLength.evaluate(&s), 5);
        assert_eq!(DeductionRule::PacingVariance.evaluate(&s), 5);
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names: Vec<&str> = DeductionRule::ALL.iter().map(|r| r.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), DeductionRule::ALL.len());
    }
}
