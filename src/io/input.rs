use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::Lexicon;
use crate::models::{AsrResponse, Transcript};

/// Parse an ASR result file into a Transcript
pub fn parse_asr_file(path: &Path) -> Result<Transcript> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_asr_json(&content)
}

/// Parse an ASR result JSON string into a Transcript
pub fn parse_asr_json(json: &str) -> Result<Transcript> {
    let response: AsrResponse = serde_json::from_str(json).context("Failed to parse ASR JSON")?;
    Ok(Transcript::from_asr(&response))
}

/// Load a lexicon from a JSON file, validating that it compiles
pub fn load_lexicon_file(path: &Path) -> Result<Lexicon> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lexicon: {:?}", path))?;
    let lexicon: Lexicon =
        serde_json::from_str(&content).context("Failed to parse lexicon JSON")?;
    lexicon
        .compile()
        .with_context(|| format!("Invalid lexicon: {:?}", path))?;
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::DisfluencyCategory;

    #[test]
    fn test_parse_asr_json() {
        let json = r#"{
            "transcript": "Hello world. How are you?",
            "confidence": 0.91,
            "words": [
                {"word": "Hello", "startTime": "0.500s", "endTime": "0.800s", "confidence": 0.95},
                {"word": "world.", "startTime": "0.900s", "endTime": "1.200s"},
                {"word": "How", "startTime": 1.5, "endTime": 1.7},
                {"word": "are", "startTime": 1.8, "endTime": 2.0},
                {"word": "you?", "startTime": 2.1, "endTime": 2.3}
            ]
        }"#;

        let transcript = parse_asr_json(json).unwrap();

        assert_eq!(transcript.text, "Hello world. How are you?");
        assert_eq!(transcript.confidence, 0.91);
        assert_eq!(transcript.words.len(), 5);
        assert_eq!(transcript.words[0].start_time_sec, 0.5);
        assert_eq!(transcript.words[0].confidence, Some(0.95));
        assert_eq!(transcript.words[4].end_time_sec, 2.3);
    }

    #[test]
    fn test_empty_words() {
        let transcript = parse_asr_json(r#"{"transcript": "", "confidence": 0.0}"#).unwrap();
        assert!(transcript.words.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_asr_json("not json").is_err());
    }

    #[test]
    fn test_parse_asr_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"transcript": "hi", "confidence": 0.9, "words": [{{"word": "hi", "startTime": "0s", "endTime": "0.2s"}}]}}"#
        )
        .unwrap();

        let transcript = parse_asr_file(file.path()).unwrap();

        assert_eq!(transcript.words.len(), 1);
        assert_eq!(transcript.words[0].end_time_sec, 0.2);
    }

    #[test]
    fn test_missing_file() {
        assert!(parse_asr_file(Path::new("/nonexistent/asr.json")).is_err());
    }

    #[test]
    fn test_load_lexicon_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"filler": ["euh", "ben"], "hedge": ["en fait"]}}"#).unwrap();

        let lexicon = load_lexicon_file(file.path()).unwrap();

        assert_eq!(lexicon.phrases(DisfluencyCategory::Filler).len(), 2);
        assert_eq!(lexicon.phrases(DisfluencyCategory::Hedge), ["en fait"]);
    }

    #[test]
    fn test_load_lexicon_rejects_repetition() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"repetition": ["again"]}}"#).unwrap();

        assert!(load_lexicon_file(file.path()).is_err());
    }
}
