use tracing::debug;

use crate::models::{Pause, PauseReport, WordTiming};

/// Thresholds for pause detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PauseConfig {
    /// Gaps strictly longer than this count as pauses, in seconds
    pub short_pause_sec: f64,
    /// Pauses strictly longer than this count as long pauses, in seconds
    pub long_pause_sec: f64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            short_pause_sec: 0.5,
            long_pause_sec: 2.0,
        }
    }
}

/// Extract pauses between adjacent words and summarize them
///
/// Returns `None` with fewer than two words. Overlapping words produce a
/// negative gap, which never counts as a pause.
pub fn analyze_pauses(words: &[WordTiming], config: &PauseConfig) -> Option<PauseReport> {
    if words.len() < 2 {
        return None;
    }

    let pauses: Vec<Pause> = words
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start_time_sec - pair[0].end_time_sec;
            (gap > config.short_pause_sec).then_some(Pause {
                start_time_sec: pair[0].end_time_sec,
                duration_sec: gap,
            })
        })
        .collect();

    let total_pauses = pauses.len();
    let long_pauses = pauses
        .iter()
        .filter(|p| p.duration_sec > config.long_pause_sec)
        .count();
    let avg_pause_duration_sec = if total_pauses > 0 {
        pauses.iter().map(|p| p.duration_sec).sum::<f64>() / total_pauses as f64
    } else {
        0.0
    };

    debug!(
        "Pauses: {} total, {} long, avg {:.2}s",
        total_pauses, long_pauses, avg_pause_duration_sec
    );

    Some(PauseReport {
        total_pauses,
        long_pauses,
        avg_pause_duration_sec,
        pauses,
    })
}
