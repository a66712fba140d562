pub mod rules;

pub use rules::*;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{normalize_words, speaking_rate};
use crate::models::{FillerWordReport, PauseReport, SentenceReport, Transcript, WordTiming};

/// A rule that took points off the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDeduction {
    pub rule: DeductionRule,
    pub points: u32,
}

/// Clarity score together with the deductions that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarityBreakdown {
    pub baseline: u32,
    /// Only rules that deducted something, in evaluation order
    pub deductions: Vec<AppliedDeduction>,
    /// Final score in `0..=100`
    pub score: u8,
}

impl ClarityBreakdown {
    pub fn total_deducted(&self) -> u32 {
        self.deductions.iter().map(|d| d.points).sum()
    }

    pub fn points_for(&self, rule: DeductionRule) -> u32 {
        self.deductions
            .iter()
            .filter(|d| d.rule == rule)
            .map(|d| d.points)
            .sum()
    }
}

impl ScoringSignals {
    /// Gather scoring signals from a normalized timeline and whichever reports exist
    ///
    /// `timeline` must already be normalized and `speaking_rate` derived from it.
    pub fn collect(
        timeline: &[WordTiming],
        confidence: f64,
        speaking_rate: Option<u32>,
        filler_words: Option<&FillerWordReport>,
        pauses: Option<&PauseReport>,
        sentences: Option<&SentenceReport>,
    ) -> Self {
        let duration_sec = match (timeline.first(), timeline.last()) {
            (Some(first), Some(last)) => (last.end_time_sec - first.start_time_sec).max(0.0),
            _ => 0.0,
        };

        Self {
            word_count: timeline.len(),
            duration_sec,
            confidence,
            speaking_rate,
            disfluencies: filler_words.map(|r| r.counts),
            total_pauses: pauses.map(|p| p.total_pauses),
            long_pauses: pauses.map(|p| p.long_pauses),
            avg_pause_duration_sec: pauses.map(|p| p.avg_pause_duration_sec),
            average_sentence_length: sentences.map(|s| s.average_sentence_length_words),
            pacing_ratio: sentences.and_then(|s| s.pacing_ratio()),
        }
    }
}

/// Evaluate every rule against the baseline and clamp the result
pub fn evaluate_signals(signals: &ScoringSignals) -> ClarityBreakdown {
    let deductions: Vec<AppliedDeduction> = DeductionRule::ALL
        .iter()
        .map(|&rule| AppliedDeduction {
            rule,
            points: rule.evaluate(signals),
        })
        .filter(|d| d.points > 0)
        .collect();

    let total: u32 = deductions.iter().map(|d| d.points).sum();
    let score = (BASELINE as i64 - total as i64).clamp(0, 100) as u8;

    debug!(
        "Clarity: {} - {} over {} rules = {}",
        BASELINE,
        total,
        deductions.len(),
        score
    );

    ClarityBreakdown {
        baseline: BASELINE,
        deductions,
        score,
    }
}

/// Composite clarity score with its per-rule breakdown
pub fn score_breakdown(
    transcript: &Transcript,
    filler_words: Option<&FillerWordReport>,
    pauses: Option<&PauseReport>,
    sentences: Option<&SentenceReport>,
) -> ClarityBreakdown {
    let timeline = normalize_words(&transcript.words);
    let signals = ScoringSignals::collect(
        &timeline,
        transcript.confidence,
        speaking_rate(&timeline),
        filler_words,
        pauses,
        sentences,
    );
    evaluate_signals(&signals)
}

/// Composite clarity score in `0..=100`
pub fn clarity_score(
    transcript: &Transcript,
    filler_words: Option<&FillerWordReport>,
    pauses: Option<&PauseReport>,
    sentences: Option<&SentenceReport>,
) -> u8 {
    score_breakdown(transcript, filler_words, pauses, sentences).score
}
