use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A time value that could not be read as seconds
#[derive(Debug, Error, PartialEq)]
pub enum TimeParseError {
    #[error("time value {0:?} is not a number of seconds")]
    Malformed(String),
    #[error("time value {0} is not finite")]
    NotFinite(f64),
}

/// Completed recognition result as delivered by the ASR collaborator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AsrResponse {
    /// Full recognized text, punctuation included
    #[serde(default)]
    pub transcript: String,
    /// Overall recognition confidence (0-1)
    #[serde(default)]
    pub confidence: f64,
    /// Word-level timings, may be missing for short or failed alignments
    #[serde(default)]
    pub words: Vec<AsrWord>,
}

/// A single recognized word with its timing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrWord {
    pub word: String,
    /// Start in seconds, either `1.5` or `"1.500s"`
    #[serde(deserialize_with = "deserialize_seconds")]
    pub start_time: f64,
    /// End in seconds, either `1.5` or `"1.500s"`
    #[serde(deserialize_with = "deserialize_seconds")]
    pub end_time: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeconds {
    Number(f64),
    Text(String),
}

/// Parse an ASR duration string such as `"2.300s"` or `"4"` into seconds
pub fn parse_seconds(value: &str) -> Result<f64, TimeParseError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
    let seconds: f64 = digits
        .trim()
        .parse()
        .map_err(|_| TimeParseError::Malformed(value.to_string()))?;
    if !seconds.is_finite() {
        return Err(TimeParseError::NotFinite(seconds));
    }
    Ok(seconds)
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawSeconds::deserialize(deserializer)? {
        RawSeconds::Number(n) => Ok(n),
        RawSeconds::Text(s) => parse_seconds(&s).map_err(serde::de::Error::custom),
    }
}
