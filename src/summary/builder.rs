use serde::{Deserialize, Serialize};

use crate::models::{HeartRateSample, SleepStage, Timeline};
use crate::segmentation::{estimate_cycles, CycleMode};

/// Aggregates for one night, recomputed on every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub total_sleep_secs: i64,
    pub rem_secs: i64,
    pub deep_secs: i64,
    pub core_secs: i64,
    pub awakenings: u32,
    pub cycles: u32,
}

impl SleepSummary {
    pub fn total_minutes(&self) -> i64 {
        self.total_sleep_secs / 60
    }

    pub fn rem_minutes(&self) -> i64 {
        self.rem_secs / 60
    }

    pub fn deep_minutes(&self) -> i64 {
        self.deep_secs / 60
    }

    pub fn core_minutes(&self) -> i64 {
        self.core_secs / 60
    }

    pub fn formatted_total(&self) -> String {
        format_sleep_duration(self.total_sleep_secs)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSummary {
    pub min_bpm: i64,
    pub max_bpm: i64,
    pub avg_bpm: i64,
}

/// Sum stage durations and awakenings across every session timeline.
///
/// The cycle count is left at zero; it is filled in by the caller once the
/// configured estimation mode has been applied to the same timelines.
pub fn summarize_sleep(timelines: &[Timeline]) -> SleepSummary {
    let mut summary = SleepSummary::default();

    for segment in timelines.iter().flatten() {
        let secs = segment.duration_secs();
        match segment.stage {
            SleepStage::Rem => summary.rem_secs += secs,
            SleepStage::Deep => summary.deep_secs += secs,
            SleepStage::Core => summary.core_secs += secs,
            SleepStage::Awake => summary.awakenings += 1,
            SleepStage::Unknown => {}
        }
    }

    summary.total_sleep_secs = summary.rem_secs + summary.deep_secs + summary.core_secs;
    summary
}

/// Stage totals plus the cycle estimate for the given mode.
pub fn build_sleep_summary(timelines: &[Timeline], mode: CycleMode) -> SleepSummary {
    let mut summary = summarize_sleep(timelines);
    summary.cycles = estimate_cycles(timelines, summary.total_sleep_secs, mode);
    summary
}

/// Min, max and unweighted mean heart rate, each rounded to the nearest bpm.
/// Non-finite readings are ignored. Returns `None` when no readings remain.
pub fn summarize_heart_rate(samples: &[HeartRateSample]) -> Option<HeartRateSummary> {
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for bpm in samples.iter().map(|s| s.bpm).filter(|bpm| bpm.is_finite()) {
        min = min.min(bpm);
        max = max.max(bpm);
        sum += bpm;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;

    Some(HeartRateSummary {
        min_bpm: min.round() as i64,
        max_bpm: max.round() as i64,
        avg_bpm: mean.round() as i64,
    })
}

/// Render a duration as whole hours plus zero-padded remainder minutes,
/// e.g. 27_660 seconds -> "7h 41m".
pub fn format_sleep_duration(total_secs: i64) -> String {
    let total_minutes = total_secs.max(0) / 60;
    format!("{}h {:02}m", total_minutes / 60, total_minutes % 60)
}
