use crate::models::{ActivityColor, ActivityKey, ActivityRecord};

use super::builder::{HeartRateSummary, SleepSummary};

pub fn steps_record(step_count: f64) -> ActivityRecord {
    ActivityRecord::new(
        ActivityKey::Steps,
        "Today's steps",
        "Goal: 10,000",
        "figure.walk",
        format_count(step_count),
        ActivityColor::Green,
    )
}

pub fn flights_record(flights_climbed: f64) -> ActivityRecord {
    ActivityRecord::new(
        ActivityKey::Flights,
        "Today's flights climbed",
        "Goal: 10",
        "figure.stairs",
        format_count(flights_climbed),
        ActivityColor::Green,
    )
}

pub fn distance_record(meters: f64) -> ActivityRecord {
    ActivityRecord::new(
        ActivityKey::Distance,
        "Walking + Running Distance",
        "Goal: 10km",
        "figure.run",
        format!("{:.2} km", meters / 1000.0),
        ActivityColor::Green,
    )
}

/// Cards for total sleep, cycles, per-stage minutes and awakenings.
pub fn sleep_records(summary: &SleepSummary) -> Vec<ActivityRecord> {
    vec![
        ActivityRecord::new(
            ActivityKey::Sleep,
            "Today's Sleep",
            "Goal: 8 hrs",
            "bed.double.fill",
            summary.formatted_total(),
            ActivityColor::Green,
        ),
        ActivityRecord::new(
            ActivityKey::SleepCycles,
            "Sleep Cycles",
            "Est. cycles last night",
            "circle.grid.cross",
            summary.cycles.to_string(),
            ActivityColor::Green,
        ),
        ActivityRecord::new(
            ActivityKey::Rem,
            "REM Sleep",
            "",
            "brain.head.profile",
            format!("{} min", summary.rem_minutes()),
            ActivityColor::Purple,
        ),
        ActivityRecord::new(
            ActivityKey::Deep,
            "Deep Sleep",
            "",
            "moon.stars.fill",
            format!("{} min", summary.deep_minutes()),
            ActivityColor::Blue,
        ),
        ActivityRecord::new(
            ActivityKey::Core,
            "Core Sleep",
            "",
            "bed.double.fill",
            format!("{} min", summary.core_minutes()),
            ActivityColor::Teal,
        ),
        ActivityRecord::new(
            ActivityKey::Awake,
            "Awakenings",
            "",
            "eye.fill",
            summary.awakenings.to_string(),
            ActivityColor::Orange,
        ),
    ]
}

pub fn heart_rate_records(summary: &HeartRateSummary) -> Vec<ActivityRecord> {
    vec![
        ActivityRecord::new(
            ActivityKey::MinHeartRate,
            "Min Heart Rate",
            "During sleep",
            "heart.fill",
            format!("{} bpm", summary.min_bpm),
            ActivityColor::Mint,
        ),
        ActivityRecord::new(
            ActivityKey::MaxHeartRate,
            "Max Heart Rate",
            "During sleep",
            "heart.circle.fill",
            format!("{} bpm", summary.max_bpm),
            ActivityColor::Red,
        ),
        ActivityRecord::new(
            ActivityKey::AvgHeartRate,
            "Avg Heart Rate",
            "During sleep",
            "waveform.path.ecg",
            format!("{} bpm", summary.avg_bpm),
            ActivityColor::Indigo,
        ),
    ]
}

/// Round to a whole number and group thousands with commas.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    if !rounded.is_finite() {
        return "0".into();
    }

    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
