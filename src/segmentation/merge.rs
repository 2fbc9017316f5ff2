use crate::models::{Segment, SleepSample, Timeline};

/// Merge one session's chronologically sorted samples into a non-overlapping
/// timeline.
///
/// When a sample overlaps the previous segment and starts after it, the
/// previous segment is cut back to the new sample's start. A sample that
/// starts at or before the previous segment's start is dropped. Segments of
/// zero or negative length are never emitted.
pub fn reconcile_timeline(samples: &[SleepSample]) -> Timeline {
    let mut timeline: Timeline = Vec::with_capacity(samples.len());

    for sample in samples {
        let candidate = Segment::from(sample);

        if let Some(last) = timeline.last_mut() {
            if last.end > candidate.start {
                if candidate.start > last.start {
                    last.end = candidate.start;
                } else {
                    continue;
                }
            }
        }

        if !candidate.is_empty() {
            timeline.push(candidate);
        }
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SleepStage;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 1, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn sample(stage: SleepStage, start: i64, end: i64) -> SleepSample {
        SleepSample::new(stage, at(start), at(end))
    }

    fn spans(timeline: &Timeline) -> Vec<(SleepStage, DateTime<Utc>, DateTime<Utc>)> {
        timeline.iter().map(|s| (s.stage, s.start, s.end)).collect()
    }

    fn assert_ordered(timeline: &Timeline) {
        for pair in timeline.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for segment in timeline {
            assert!(segment.end > segment.start);
        }
    }

    #[test]
    fn test_non_overlapping_samples_pass_through() {
        let timeline = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 30),
            sample(SleepStage::Deep, 30, 50),
            sample(SleepStage::Rem, 55, 70),
        ]);
        assert_eq!(
            spans(&timeline),
            vec![
                (SleepStage::Core, at(0), at(30)),
                (SleepStage::Deep, at(30), at(50)),
                (SleepStage::Rem, at(55), at(70)),
            ]
        );
    }

    #[test]
    fn test_overlap_truncates_previous_segment() {
        let timeline = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 40),
            sample(SleepStage::Deep, 25, 60),
        ]);
        assert_eq!(
            spans(&timeline),
            vec![
                (SleepStage::Core, at(0), at(25)),
                (SleepStage::Deep, at(25), at(60)),
            ]
        );
        assert_ordered(&timeline);
    }

    #[test]
    fn test_candidate_starting_with_previous_is_discarded() {
        let timeline = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 40),
            sample(SleepStage::Awake, 0, 10),
            sample(SleepStage::Rem, 40, 50),
        ]);
        assert_eq!(
            spans(&timeline),
            vec![
                (SleepStage::Core, at(0), at(40)),
                (SleepStage::Rem, at(40), at(50)),
            ]
        );
    }

    #[test]
    fn test_contained_candidate_keeps_its_own_end() {
        // Previous loses its tail; the shorter candidate's end is kept as-is
        let timeline = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 60),
            sample(SleepStage::Awake, 20, 25),
        ]);
        assert_eq!(
            spans(&timeline),
            vec![
                (SleepStage::Core, at(0), at(20)),
                (SleepStage::Awake, at(20), at(25)),
            ]
        );
    }

    #[test]
    fn test_zero_length_sample_is_never_emitted() {
        let timeline = reconcile_timeline(&[sample(SleepStage::Deep, 10, 10)]);
        assert!(timeline.is_empty());

        let timeline = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 20),
            sample(SleepStage::Rem, 20, 20),
            sample(SleepStage::Deep, 20, 30),
        ]);
        assert_eq!(timeline.len(), 2);
        assert_ordered(&timeline);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let first = reconcile_timeline(&[
            sample(SleepStage::Core, 0, 40),
            sample(SleepStage::Deep, 25, 60),
            sample(SleepStage::Deep, 25, 30),
            sample(SleepStage::Awake, 58, 62),
            sample(SleepStage::Rem, 62, 80),
        ]);
        assert_ordered(&first);

        let replayed: Vec<SleepSample> = first.iter().map(SleepSample::from).collect();
        let second = reconcile_timeline(&replayed);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(a.same_span(b));
        }
    }
}
