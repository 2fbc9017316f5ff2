//! Raw samples as handed over by the health-data store.
//!
//! Sleep samples carry the platform category code untouched so the
//! segmentation filter can tell "asleep, unspecified" apart from stages that
//! simply map to [`SleepStage::Unknown`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Category codes used by the platform sleep-analysis samples.
pub mod sleep_value {
    pub const IN_BED: i32 = 0;
    pub const ASLEEP_UNSPECIFIED: i32 = 1;
    pub const AWAKE: i32 = 2;
    pub const ASLEEP_CORE: i32 = 3;
    pub const ASLEEP_DEEP: i32 = 4;
    pub const ASLEEP_REM: i32 = 5;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SleepStage {
    Awake,
    Rem,
    Core,
    Deep,
    Unknown,
}

impl Default for SleepStage {
    fn default() -> Self {
        SleepStage::Unknown
    }
}

impl SleepStage {
    pub fn from_value(value: i32) -> Self {
        match value {
            sleep_value::AWAKE => SleepStage::Awake,
            sleep_value::ASLEEP_CORE => SleepStage::Core,
            sleep_value::ASLEEP_DEEP => SleepStage::Deep,
            sleep_value::ASLEEP_REM => SleepStage::Rem,
            _ => SleepStage::Unknown,
        }
    }

    /// REM, Core and Deep count towards total sleep; Awake and Unknown do not.
    pub fn is_asleep(&self) -> bool {
        matches!(self, SleepStage::Rem | SleepStage::Core | SleepStage::Deep)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStage::Awake => "Awake",
            SleepStage::Rem => "Rem",
            SleepStage::Core => "Core",
            SleepStage::Deep => "Deep",
            SleepStage::Unknown => "Unknown",
        }
    }
}

/// A sleep-analysis sample exactly as the store returned it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSleepSample {
    pub value: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source_bundle_id: String,
}

/// A filtered sleep sample with its stage resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SleepSample {
    pub stage: SleepStage,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepSample {
    pub fn new(stage: SleepStage, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { stage, start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl From<&RawSleepSample> for SleepSample {
    fn from(raw: &RawSleepSample) -> Self {
        Self {
            stage: SleepStage::from_value(raw.value),
            start: raw.start,
            end: raw.end,
        }
    }
}

/// A single heart-rate point sample, in beats per minute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSample {
    pub timestamp: DateTime<Utc>,
    pub bpm: f64,
}
