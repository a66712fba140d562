use crate::models::WordTiming;

/// Words per minute for `word_count` words spoken over `duration_sec`
///
/// `None` when there are no words or the duration is not positive.
pub fn words_per_minute(word_count: usize, duration_sec: f64) -> Option<u32> {
    if word_count == 0 || !(duration_sec > 0.0) {
        return None;
    }
    Some((word_count as f64 / (duration_sec / 60.0)).round() as u32)
}

/// Overall speaking rate from the first word's start to the last word's end
pub fn speaking_rate(words: &[WordTiming]) -> Option<u32> {
    let first = words.first()?;
    let last = words.last()?;
    words_per_minute(words.len(), last.end_time_sec - first.start_time_sec)
}
