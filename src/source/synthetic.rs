use anyhow::{bail, Result};
use chrono::{DateTime, Datelike, Duration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::models::{sleep_value, HeartRateSample, RawSleepSample};

use super::{DayRange, HealthDataType, QuantityMetric, SampleSource};

const TRUSTED_SOURCE: &str = "com.apple.health.synthetic";
const UNTRUSTED_SOURCE: &str = "com.example.sleeptracker";
const HEART_RATE_INTERVAL_MINS: i64 = 5;

/// Deterministic stand-in for the platform store.
///
/// Every day gets its own seeded generator, so repeated queries for the same
/// day return identical data.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    authorized: bool,
    seed: u64,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            authorized: true,
            seed: 0x7edd,
        }
    }
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorization(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    fn rng_for(&self, range: &DayRange, salt: u64) -> StdRng {
        let day = range.day.num_days_from_ce() as u64;
        StdRng::seed_from_u64(self.seed ^ day.wrapping_mul(31).wrapping_add(salt))
    }

    /// One overnight session plus, some days, an afternoon nap.
    pub fn sleep_samples_for(&self, range: &DayRange) -> Vec<RawSleepSample> {
        let mut rng = self.rng_for(range, 1);
        let mut samples = Vec::new();

        let night_start = range.start + Duration::minutes(rng.gen_range(15..75));
        let night_end = push_night(&mut rng, night_start, &mut samples);

        // A correction sample overlapping the tail of an earlier one
        if let Some(target) = samples.get(samples.len() / 2).cloned() {
            let overlap_start = target.end - Duration::minutes(rng.gen_range(2..6));
            samples.push(trusted(
                sleep_value::ASLEEP_CORE,
                overlap_start,
                overlap_start + Duration::minutes(rng.gen_range(8..15)),
            ));
        }

        // Noise the filter has to remove
        if let Some(first) = samples.first().cloned() {
            samples.push(RawSleepSample {
                source_bundle_id: UNTRUSTED_SOURCE.into(),
                ..first
            });
        }
        samples.push(trusted(
            sleep_value::ASLEEP_UNSPECIFIED,
            night_start,
            night_end,
        ));

        if rng.gen_bool(0.4) {
            let nap_start = range.start + Duration::hours(14) + Duration::minutes(rng.gen_range(0..90));
            let deep_end = nap_start + Duration::minutes(rng.gen_range(10..20));
            let core_end = deep_end + Duration::minutes(rng.gen_range(10..25));
            let rem_end = core_end + Duration::minutes(rng.gen_range(5..15));
            samples.push(trusted(sleep_value::ASLEEP_DEEP, nap_start, deep_end));
            samples.push(trusted(sleep_value::ASLEEP_CORE, deep_end, core_end));
            samples.push(trusted(sleep_value::ASLEEP_REM, core_end, rem_end));
        }

        samples
    }

    pub fn heart_rate_for(&self, range: &DayRange) -> Vec<HeartRateSample> {
        let mut rng = self.rng_for(range, 2);
        let night_start = range.start + Duration::minutes(30);
        let points = 8 * 60 / HEART_RATE_INTERVAL_MINS;

        (0..points)
            .map(|i| HeartRateSample {
                timestamp: night_start + Duration::minutes(i * HEART_RATE_INTERVAL_MINS),
                bpm: 58.0 + rng.gen_range(-6.0..12.0),
            })
            .collect()
    }

    pub fn aggregate_for(&self, metric: QuantityMetric, range: &DayRange) -> f64 {
        let mut rng = self.rng_for(range, 3);
        let steps: f64 = rng.gen_range(2_000.0..14_000.0_f64).round();
        match metric {
            QuantityMetric::StepCount => steps,
            QuantityMetric::FlightsClimbed => f64::from(rng.gen_range(0..25_u32)),
            QuantityMetric::DistanceWalkingRunning => steps * 0.76,
        }
    }
}

fn trusted(value: i32, start: DateTime<Utc>, end: DateTime<Utc>) -> RawSleepSample {
    RawSleepSample {
        value,
        start,
        end,
        source_bundle_id: TRUSTED_SOURCE.into(),
    }
}

/// Core -> Deep -> Core -> REM cycles with occasional short awakenings.
/// Returns the end of the last sample.
fn push_night(rng: &mut StdRng, start: DateTime<Utc>, out: &mut Vec<RawSleepSample>) -> DateTime<Utc> {
    let mut cursor = start;
    let cycles = rng.gen_range(4..6);

    for cycle in 0..cycles {
        // Deep sleep shortens and REM lengthens as the night goes on
        let deep_mins = (40 - cycle * 7).max(8);
        let rem_mins = 10 + cycle * 6;

        let phases = [
            (sleep_value::ASLEEP_CORE, rng.gen_range(15..30)),
            (sleep_value::ASLEEP_DEEP, deep_mins + rng.gen_range(0..8)),
            (sleep_value::ASLEEP_CORE, rng.gen_range(10..25)),
            (sleep_value::ASLEEP_REM, rem_mins + rng.gen_range(0..8)),
        ];
        for (value, minutes) in phases {
            let end = cursor + Duration::minutes(minutes);
            out.push(trusted(value, cursor, end));
            cursor = end;
        }

        if rng.gen_bool(0.4) {
            let end = cursor + Duration::minutes(rng.gen_range(1..6));
            out.push(trusted(sleep_value::AWAKE, cursor, end));
            cursor = end;
        }
    }

    cursor
}

impl SampleSource for SyntheticSource {
    async fn authorize(&self, _types: &[HealthDataType]) -> Result<()> {
        if !self.authorized {
            bail!("health data access denied");
        }
        Ok(())
    }

    async fn query_aggregate(&self, metric: QuantityMetric, range: DayRange) -> Result<Option<f64>> {
        Ok(Some(self.aggregate_for(metric, &range)))
    }

    async fn query_sleep_samples(&self, range: DayRange) -> Result<Vec<RawSleepSample>> {
        Ok(self.sleep_samples_for(&range))
    }

    async fn query_heart_rate(&self, range: DayRange) -> Result<Vec<HeartRateSample>> {
        Ok(self.heart_rate_for(&range))
    }
}
