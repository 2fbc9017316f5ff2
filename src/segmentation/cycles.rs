use serde::{Deserialize, Serialize};

use crate::models::{SleepStage, Timeline};

/// The progression that counts as one completed cycle in pattern mode.
const CYCLE_PATTERN: [SleepStage; 3] = [SleepStage::Deep, SleepStage::Core, SleepStage::Rem];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CycleMode {
    /// Count Deep -> Core -> REM progressions inside each session
    Pattern,
    /// Divide total sleep by a fixed average cycle length
    Duration { average_cycle_minutes: u32 },
}

/// Estimate completed cycles with whichever mode is configured.
pub fn estimate_cycles(timelines: &[Timeline], total_sleep_secs: i64, mode: CycleMode) -> u32 {
    match mode {
        CycleMode::Pattern => timelines.iter().map(|t| count_pattern_cycles(t)).sum(),
        CycleMode::Duration {
            average_cycle_minutes,
        } => cycles_from_duration(total_sleep_secs, average_cycle_minutes),
    }
}

/// Count non-overlapping Deep -> Core -> REM runs in one session timeline.
///
/// Awake and Unknown segments are skipped entirely; only the three most
/// recent qualifying stages are kept, and a match clears them.
pub fn count_pattern_cycles(timeline: &Timeline) -> u32 {
    let mut recent: Vec<SleepStage> = Vec::with_capacity(CYCLE_PATTERN.len() + 1);
    let mut cycles = 0;

    for segment in timeline.iter().filter(|s| s.stage.is_asleep()) {
        recent.push(segment.stage);
        if recent.len() > CYCLE_PATTERN.len() {
            recent.remove(0);
        }

        if recent[..] == CYCLE_PATTERN[..] {
            cycles += 1;
            recent.clear();
        }
    }

    cycles
}

/// Whole cycles of `average_cycle_minutes` that fit into the total sleep time.
pub fn cycles_from_duration(total_sleep_secs: i64, average_cycle_minutes: u32) -> u32 {
    let cycle_secs = i64::from(average_cycle_minutes) * 60;
    if cycle_secs == 0 || total_sleep_secs <= 0 {
        return 0;
    }
    u32::try_from(total_sleep_secs / cycle_secs).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn timeline(stages: &[SleepStage]) -> Timeline {
        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let start = i as i64 * 10;
                Segment::new(*stage, at(start), at(start + 10))
            })
            .collect()
    }

    use SleepStage::{Awake, Core, Deep, Rem, Unknown};

    #[test]
    fn test_single_pattern_is_one_cycle() {
        assert_eq!(count_pattern_cycles(&timeline(&[Deep, Core, Rem])), 1);
    }

    #[test]
    fn test_repeated_pattern_counts_twice() {
        assert_eq!(
            count_pattern_cycles(&timeline(&[Deep, Core, Rem, Deep, Core, Rem])),
            2
        );
    }

    #[test]
    fn test_wrong_order_counts_nothing() {
        assert_eq!(count_pattern_cycles(&timeline(&[Deep, Rem, Core])), 0);
    }

    #[test]
    fn test_awake_and_unknown_are_transparent() {
        assert_eq!(
            count_pattern_cycles(&timeline(&[Deep, Awake, Core, Unknown, Rem])),
            1
        );
    }

    #[test]
    fn test_window_slides_over_leading_stages() {
        // Core, Core, Deep, Core, Rem: the last three form the pattern
        assert_eq!(
            count_pattern_cycles(&timeline(&[Core, Core, Deep, Core, Rem])),
            1
        );
    }

    #[test]
    fn test_pattern_mode_sums_sessions() {
        let sessions = vec![timeline(&[Deep, Core, Rem]), timeline(&[Deep, Core, Rem])];
        assert_eq!(estimate_cycles(&sessions, 0, CycleMode::Pattern), 2);
    }

    #[test]
    fn test_pattern_does_not_span_sessions() {
        let sessions = vec![timeline(&[Deep, Core]), timeline(&[Rem])];
        assert_eq!(estimate_cycles(&sessions, 0, CycleMode::Pattern), 0);
    }

    #[test]
    fn test_duration_mode_discards_remainder() {
        let mode = CycleMode::Duration {
            average_cycle_minutes: 90,
        };
        assert_eq!(estimate_cycles(&[], 27_000, mode), 5);
        assert_eq!(estimate_cycles(&[], 27_000 + 5_399, mode), 5);
    }

    #[test]
    fn test_empty_inputs_yield_zero() {
        assert_eq!(estimate_cycles(&[], 0, CycleMode::Pattern), 0);
        assert_eq!(
            estimate_cycles(
                &[],
                0,
                CycleMode::Duration {
                    average_cycle_minutes: 90
                }
            ),
            0
        );
        assert_eq!(cycles_from_duration(10_000, 0), 0);
    }
}
