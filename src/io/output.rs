use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::TranscriptAnalysis;
use crate::models::{FillerWordReport, PauseReport, SentenceReport, Transcript, WordTiming};
use crate::scoring::ClarityBreakdown;

/// Transcript with all derived metrics, as stored with a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTranscript {
    pub transcript: String,
    pub confidence: f64,
    pub words: Vec<WordTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaking_rate: Option<u32>,
    pub clarity_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_words: Option<FillerWordReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_analysis: Option<PauseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_analysis: Option<SentenceReport>,
    pub clarity_breakdown: ClarityBreakdown,
    pub metadata: AnalysisMetadata,
}

/// Bookkeeping about the analysis call itself
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub processing_ms: u64,
}

impl AnalysisMetadata {
    pub fn new(processing_ms: u64) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            processing_ms,
        }
    }
}

impl EnrichedTranscript {
    pub fn from_analysis(
        transcript: &Transcript,
        analysis: TranscriptAnalysis,
        metadata: AnalysisMetadata,
    ) -> Self {
        Self {
            transcript: transcript.text.clone(),
            confidence: transcript.confidence,
            words: transcript.words.clone(),
            speaking_rate: analysis.speaking_rate,
            clarity_score: analysis.clarity.score,
            filler_words: analysis.filler_words,
            pause_analysis: analysis.pause_analysis,
            sentence_analysis: analysis.sentence_analysis,
            clarity_breakdown: analysis.clarity,
            metadata,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable metrics summary
pub struct MetricsReport<'a> {
    transcript: &'a Transcript,
    analysis: &'a TranscriptAnalysis,
}

impl<'a> MetricsReport<'a> {
    pub fn new(transcript: &'a Transcript, analysis: &'a TranscriptAnalysis) -> Self {
        Self {
            transcript,
            analysis,
        }
    }

    /// Format the metrics as text
    pub fn format(&self) -> String {
        let mut output = String::new();
        let analysis = self.analysis;

        output.push_str("Speech Metrics\n==============\n");
        output.push_str(&format!("Words: {}\n", self.transcript.word_count()));
        output.push_str(&format!(
            "Duration: {}\n",
            format_timestamp(self.transcript.duration_sec())
        ));
        output.push_str(&format!(
            "Recognition confidence: {:.0}%\n",
            self.transcript.confidence * 100.0
        ));
        match analysis.speaking_rate {
            Some(wpm) => output.push_str(&format!("Speaking rate: {} wpm\n", wpm)),
            None => output.push_str("Speaking rate: n/a\n"),
        }
        output.push_str(&format!("Clarity score: {}/100\n", analysis.clarity.score));

        if let Some(fillers) = &analysis.filler_words {
            output.push_str(&format!(
                "\nDisfluencies ({}: {} filler, {} hedge, {} repetition)\n",
                fillers.count, fillers.counts.filler, fillers.counts.hedge, fillers.counts.repetition
            ));
            for mark in &fillers.marks {
                output.push_str(&format!(
                    "  [{}] {} \"{}\"\n",
                    format_timestamp(mark.timestamp_sec),
                    mark.category,
                    mark.phrase
                ));
            }
        }

        if let Some(pauses) = &analysis.pause_analysis {
            output.push_str(&format!(
                "\nPauses: {} total, {} long, avg {:.2}s\n",
                pauses.total_pauses, pauses.long_pauses, pauses.avg_pause_duration_sec
            ));
            for pause in &pauses.pauses {
                output.push_str(&format!(
                    "  [{}] {:.2}s\n",
                    format_timestamp(pause.start_time_sec),
                    pause.duration_sec
                ));
            }
        }

        if let Some(sentences) = &analysis.sentence_analysis {
            output.push_str(&format!(
                "\nSentences: {} (avg {:.1} words)\n",
                sentences.sentences.len(),
                sentences.average_sentence_length_words
            ));
            for sentence in &sentences.sentences {
                let pace = sentence
                    .words_per_minute
                    .map(|wpm| format!("{} wpm", wpm))
                    .unwrap_or_else(|| "n/a".to_string());
                output.push_str(&format!(
                    "  [{}] ({}) {}\n",
                    format_timestamp(sentence.start_time_sec),
                    pace,
                    sentence.text
                ));
            }
        }

        output.push_str(&format!(
            "\nDeductions from baseline {}:\n",
            analysis.clarity.baseline
        ));
        if analysis.clarity.deductions.is_empty() {
            output.push_str("  none\n");
        }
        for deduction in &analysis.clarity.deductions {
            output.push_str(&format!("  -{:<3} {}\n", deduction.points, deduction.rule));
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Format seconds as MM:SS.mmm
fn format_timestamp(seconds: f64) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let secs = ms / 1000;
    let millis = ms % 1000;
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, millis)
}
