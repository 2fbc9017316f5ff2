use crate::models::{sleep_value, RawSleepSample, Session, SleepSample, Timeline};
use crate::segmentation::config::SegmentationConfig;
use crate::segmentation::merge::reconcile_timeline;

/// Drop unspecified-stage and untrusted samples, then sort by start time.
pub fn filter_samples(raw: &[RawSleepSample], config: &SegmentationConfig) -> Vec<SleepSample> {
    let mut samples: Vec<SleepSample> = raw
        .iter()
        .filter(|r| r.value != sleep_value::ASLEEP_UNSPECIFIED)
        .filter(|r| r.source_bundle_id.starts_with(&config.trusted_source_prefix))
        .map(SleepSample::from)
        .collect();

    samples.sort_by_key(|s| s.start);
    samples
}

/// Split sorted samples into sessions wherever the gap between one sample's
/// end and the next sample's start exceeds the configured threshold.
pub fn group_sessions(samples: Vec<SleepSample>, config: &SegmentationConfig) -> Vec<Session> {
    let gap_threshold = config.session_gap();
    let mut sessions = Vec::new();
    let mut current: Vec<SleepSample> = Vec::new();

    for sample in samples {
        let starts_new_session = current
            .last()
            .map_or(false, |previous| sample.start - previous.end > gap_threshold);

        if starts_new_session {
            let finished = std::mem::replace(&mut current, vec![sample]);
            sessions.push(Session { samples: finished });
        } else {
            current.push(sample);
        }
    }

    // Push final session
    if !current.is_empty() {
        sessions.push(Session { samples: current });
    }

    sessions
}

/// Full pipeline for one day's raw sleep samples: filter, group, reconcile.
///
/// Sessions whose timeline reconciles to nothing (all zero-length samples)
/// are left out of the result.
pub fn segment_day(raw: &[RawSleepSample], config: &SegmentationConfig) -> Vec<Timeline> {
    let samples = filter_samples(raw, config);
    if samples.is_empty() {
        return Vec::new();
    }

    group_sessions(samples, config)
        .iter()
        .map(|session| reconcile_timeline(&session.samples))
        .filter(|timeline| !timeline.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SleepStage;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 22, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn sample(stage: SleepStage, start: i64, end: i64) -> SleepSample {
        SleepSample::new(stage, at(start), at(end))
    }

    fn raw(value: i32, start: i64, end: i64, source: &str) -> RawSleepSample {
        RawSleepSample {
            value,
            start: at(start),
            end: at(end),
            source_bundle_id: source.into(),
        }
    }

    #[test]
    fn test_empty_input_yields_no_sessions() {
        let sessions = group_sessions(Vec::new(), &SegmentationConfig::default());
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_single_sample_yields_single_session() {
        let sessions = group_sessions(
            vec![sample(SleepStage::Core, 0, 20)],
            &SegmentationConfig::default(),
        );
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 1);
    }

    #[test]
    fn test_gap_of_exactly_thirty_minutes_stays_in_session() {
        let samples = vec![
            sample(SleepStage::Core, 0, 20),
            sample(SleepStage::Deep, 50, 70),
        ];
        let sessions = group_sessions(samples, &SegmentationConfig::default());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].len(), 2);
    }

    #[test]
    fn test_gap_over_thirty_minutes_splits_sessions() {
        let samples = vec![
            sample(SleepStage::Core, 0, 20),
            sample(SleepStage::Deep, 20, 40),
            sample(SleepStage::Core, 71, 90),
            sample(SleepStage::Rem, 90, 100),
            sample(SleepStage::Core, 400, 420),
        ];
        let sessions = group_sessions(samples.clone(), &SegmentationConfig::default());
        let sizes: Vec<usize> = sessions.iter().map(Session::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        // Union covers the input exactly, in order
        let flattened: Vec<SleepSample> = sessions
            .iter()
            .flat_map(|s| s.samples.iter().copied())
            .collect();
        assert_eq!(flattened, samples);

        let gap = SegmentationConfig::default().session_gap();
        for session in &sessions {
            for pair in session.samples.windows(2) {
                assert!(pair[1].start - pair[0].end <= gap);
            }
        }
        for pair in sessions.windows(2) {
            assert!(pair[1].start().unwrap() - pair[0].end().unwrap() > gap);
        }
    }

    #[test]
    fn test_overlapping_samples_never_split() {
        // Negative gap: the next sample starts before the previous one ends
        let samples = vec![
            sample(SleepStage::Core, 0, 60),
            sample(SleepStage::Deep, 30, 45),
        ];
        let sessions = group_sessions(samples, &SegmentationConfig::default());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_filter_drops_unspecified_and_untrusted_and_sorts() {
        let raw_samples = vec![
            raw(sleep_value::ASLEEP_REM, 40, 50, "com.apple.health.ABC"),
            raw(sleep_value::ASLEEP_UNSPECIFIED, 0, 10, "com.apple.health.ABC"),
            raw(sleep_value::ASLEEP_CORE, 10, 40, "com.apple.health.ABC"),
            raw(sleep_value::ASLEEP_DEEP, 10, 20, "com.example.tracker"),
            raw(sleep_value::IN_BED, 0, 60, "com.apple.health.XYZ"),
        ];
        let filtered = filter_samples(&raw_samples, &SegmentationConfig::default());
        let stages: Vec<SleepStage> = filtered.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![SleepStage::Unknown, SleepStage::Core, SleepStage::Rem]
        );
    }

    #[test]
    fn test_segment_day_drops_sessions_without_segments() {
        let source = "com.apple.health.ABC";
        let raw_samples = vec![
            // zero-length sample alone in its own session
            raw(sleep_value::ASLEEP_CORE, 0, 0, source),
            raw(sleep_value::ASLEEP_DEEP, 120, 150, source),
            raw(sleep_value::ASLEEP_CORE, 150, 170, source),
        ];
        let timelines = segment_day(&raw_samples, &SegmentationConfig::default());
        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].len(), 2);
        assert_eq!(timelines[0][0].stage, SleepStage::Deep);
    }
}
