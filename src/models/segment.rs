use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sample::{SleepSample, SleepStage};

/// One reconciled, non-overlapping stage interval inside a session timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub stage: SleepStage,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Segment {
    pub fn new(stage: SleepStage, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            stage,
            start,
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration().num_seconds()
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Same stage and bounds; the identifier is ignored.
    pub fn same_span(&self, other: &Segment) -> bool {
        self.stage == other.stage && self.start == other.start && self.end == other.end
    }
}

impl From<&SleepSample> for Segment {
    fn from(sample: &SleepSample) -> Self {
        Segment::new(sample.stage, sample.start, sample.end)
    }
}

impl From<&Segment> for SleepSample {
    fn from(segment: &Segment) -> Self {
        SleepSample::new(segment.stage, segment.start, segment.end)
    }
}

/// A contiguous sleep period: the raw samples assigned to it by the grouper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub samples: Vec<SleepSample>,
}

impl Session {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.start)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.end)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The reconciled timeline of one session.
pub type Timeline = Vec<Segment>;
