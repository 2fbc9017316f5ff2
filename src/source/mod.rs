//! The boundary to the platform health-data store.
//!
//! The core never builds platform queries; it asks a [`SampleSource`] for a
//! day's aggregates and samples and works with whatever comes back.

pub mod synthetic;

use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{HeartRateSample, RawSleepSample};

pub use synthetic::SyntheticSource;

/// Summable quantity metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum QuantityMetric {
    StepCount,
    FlightsClimbed,
    /// Metres
    DistanceWalkingRunning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum HealthDataType {
    Quantity(QuantityMetric),
    SleepAnalysis,
    HeartRate,
}

impl HealthDataType {
    /// Everything the summary reads.
    pub fn all_read_types() -> Vec<HealthDataType> {
        vec![
            HealthDataType::Quantity(QuantityMetric::StepCount),
            HealthDataType::Quantity(QuantityMetric::FlightsClimbed),
            HealthDataType::Quantity(QuantityMetric::DistanceWalkingRunning),
            HealthDataType::SleepAnalysis,
            HealthDataType::HeartRate,
        ]
    }
}

/// Half-open `[start, end)` interval covering one calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayRange {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// The local-time day, falling back to UTC midnight when local midnight
    /// does not exist (DST gaps).
    pub fn for_day(day: NaiveDate) -> Self {
        let start = local_midnight(day);
        let end = local_midnight(day + Duration::days(1));
        Self { day, start, end }
    }

    /// Day boundaries in UTC, independent of the host time zone.
    pub fn for_day_utc(day: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN));
        Self {
            day,
            start,
            end: start + Duration::days(1),
        }
    }
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(chrono::NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// Asynchronous access to the platform health-data store.
///
/// Each call is an independent request; failures are reported once and are
/// never retried by the caller.
pub trait SampleSource: Send + Sync + 'static {
    /// Request read access to the given types.
    fn authorize(&self, types: &[HealthDataType]) -> impl Future<Output = Result<()>> + Send;

    /// Sum of `metric` over the day. `None` when the store has no samples.
    fn query_aggregate(
        &self,
        metric: QuantityMetric,
        range: DayRange,
    ) -> impl Future<Output = Result<Option<f64>>> + Send;

    /// Sleep-analysis samples starting inside the day, in any order.
    fn query_sleep_samples(
        &self,
        range: DayRange,
    ) -> impl Future<Output = Result<Vec<RawSleepSample>>> + Send;

    /// Heart-rate point samples inside the day.
    fn query_heart_rate(
        &self,
        range: DayRange,
    ) -> impl Future<Output = Result<Vec<HeartRateSample>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_day_range_spans_one_day() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let range = DayRange::for_day_utc(day);
        assert_eq!(range.end - range.start, Duration::days(1));
        assert_eq!(range.start.date_naive(), day);
    }

    #[test]
    fn test_local_day_range_is_ordered() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let range = DayRange::for_day(day);
        assert!(range.start < range.end);
        assert_eq!(range.day, day);
    }
}
