pub mod disfluency;
pub mod pauses;
pub mod rate;
pub mod sentences;
pub mod timeline;

pub use disfluency::*;
pub use pauses::*;
pub use rate::*;
pub use sentences::*;
pub use timeline::*;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::models::{FillerWordReport, PauseReport, SentenceReport, Transcript};
use crate::scoring::{ClarityBreakdown, ScoringSignals, evaluate_signals};

/// Configuration for the metrics engine
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Phrases flagged as fillers and hedges
    pub lexicon: Lexicon,
    /// Pause detection thresholds
    pub pauses: PauseConfig,
}

/// Every metric derived from one transcript
///
/// Sub-analyses are `None` when the transcript lacked the data they need.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptAnalysis {
    pub speaking_rate: Option<u32>,
    pub filler_words: Option<FillerWordReport>,
    pub pause_analysis: Option<PauseReport>,
    pub sentence_analysis: Option<SentenceReport>,
    pub clarity: ClarityBreakdown,
}

impl TranscriptAnalysis {
    pub fn clarity_score(&self) -> u8 {
        self.clarity.score
    }
}

/// Metrics engine with a compiled lexicon
///
/// Holds no per-transcript state, so one analyzer can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Analyzer {
    lexicon: CompiledLexicon,
    pauses: PauseConfig,
}

static DEFAULT_ANALYZER: Lazy<Analyzer> =
    Lazy::new(|| Analyzer::new(&AnalysisConfig::default()).unwrap());

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Result<Self, LexiconError> {
        Ok(Self {
            lexicon: config.lexicon.compile()?,
            pauses: config.pauses,
        })
    }

    /// Shared analyzer using the default English lexicon and thresholds
    pub fn default_shared() -> &'static Analyzer {
        &DEFAULT_ANALYZER
    }

    /// Run every sub-analysis and score the result
    ///
    /// The word timeline is normalized once and shared by the detectors,
    /// which are independent of each other.
    pub fn analyze(&self, transcript: &Transcript) -> TranscriptAnalysis {
        let timeline = normalize_words(&transcript.words);
        let has_words = !timeline.is_empty();

        let filler_words =
            has_words.then(|| detect_disfluencies(&transcript.text, &timeline, &self.lexicon));
        let pause_analysis = analyze_pauses(&timeline, &self.pauses);
        let sentence_analysis = segment_sentences(&transcript.text, &timeline);
        let speaking_rate = speaking_rate(&timeline);

        let clarity = evaluate_signals(&ScoringSignals::collect(
            &timeline,
            transcript.confidence,
            speaking_rate,
            filler_words.as_ref(),
            pause_analysis.as_ref(),
            sentence_analysis.as_ref(),
        ));

        debug!(
            "Analyzed {} words: rate={:?} clarity={}",
            timeline.len(),
            speaking_rate,
            clarity.score
        );

        TranscriptAnalysis {
            speaking_rate,
            filler_words,
            pause_analysis,
            sentence_analysis,
            clarity,
        }
    }
}

/// Analyze a transcript with the default analyzer
pub fn analyze_transcript(transcript: &Transcript) -> TranscriptAnalysis {
    Analyzer::default_shared().analyze(transcript)
}

/// Overall words per minute, `None` without usable word timings
pub fn calculate_speaking_rate(transcript: &Transcript) -> Option<u32> {
    speaking_rate(&normalize_words(&transcript.words))
}

/// Composite clarity score in `0..=100` using the default analyzer
pub fn calculate_clarity_score(transcript: &Transcript) -> u8 {
    analyze_transcript(transcript).clarity_score()
}
