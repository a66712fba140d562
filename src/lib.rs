pub mod analysis;
pub mod io;
pub mod models;
pub mod scoring;

pub use analysis::{
    AnalysisConfig, Analyzer, Lexicon, LexiconError, PauseConfig, TranscriptAnalysis,
    analyze_transcript, calculate_clarity_score, calculate_speaking_rate,
};
pub use io::{
    AnalysisMetadata, EnrichedTranscript, MetricsReport, load_lexicon_file, parse_asr_file,
    parse_asr_json,
};
pub use models::{
    DisfluencyCategory, DisfluencyMark, FillerWordReport, Pause, PauseReport, Sentence,
    SentenceReport, Transcript, WordTiming,
};
pub use scoring::{ClarityBreakdown, DeductionRule};
