use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    models::ActivityKey,
    segmentation::{segment_day, CycleMode, SegmentationConfig},
    settings::{CycleSettings, SettingsStore},
    source::{DayRange, HealthDataType, QuantityMetric, SampleSource},
    summary::{
        build_sleep_summary, distance_record, flights_record, heart_rate_records, sleep_records,
        steps_record, summarize_heart_rate,
    },
};

use super::state::{AuthorizationStatus, HealthSnapshot, HealthState, Metric, StateUpdate};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchOutcome {
    Applied,
    Failed,
    Stale,
}

/// What happened to each fetch of one refresh.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub day: NaiveDate,
    pub generation: u64,
    pub applied: Vec<Metric>,
    pub failed: Vec<Metric>,
    /// Finished after a newer refresh started; results were dropped
    pub stale: Vec<Metric>,
    /// Nothing was fetched because access was denied
    pub skipped: bool,
}

impl RefreshReport {
    fn new(day: NaiveDate, generation: u64) -> Self {
        Self {
            day,
            generation,
            applied: Vec::new(),
            failed: Vec::new(),
            stale: Vec::new(),
            skipped: false,
        }
    }

    fn skipped(day: NaiveDate) -> Self {
        Self {
            skipped: true,
            ..Self::new(day, 0)
        }
    }

    fn record(&mut self, metric: Metric, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Applied => self.applied.push(metric),
            FetchOutcome::Failed => self.failed.push(metric),
            FetchOutcome::Stale => self.stale.push(metric),
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns the published health state and drives every fetch against the source.
///
/// All writes go through the state mutex; fetches for one refresh run
/// concurrently and each writes its own slice of the state as it completes.
pub struct HealthController<S: SampleSource> {
    state: Arc<Mutex<HealthState>>,
    source: Arc<S>,
    settings: Arc<SettingsStore>,
    segmentation: Arc<SegmentationConfig>,
    today: fn() -> NaiveDate,
}

impl<S: SampleSource> Clone for HealthController<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            source: Arc::clone(&self.source),
            settings: Arc::clone(&self.settings),
            segmentation: Arc::clone(&self.segmentation),
            today: self.today,
        }
    }
}

impl<S: SampleSource> HealthController<S> {
    pub fn new(source: S, settings: Arc<SettingsStore>) -> Self {
        Self::with_clock(source, settings, local_today)
    }

    /// Use `today` instead of the local calendar to decide which days exist.
    pub fn with_clock(source: S, settings: Arc<SettingsStore>, today: fn() -> NaiveDate) -> Self {
        Self {
            state: Arc::new(Mutex::new(HealthState::new(today()))),
            source: Arc::new(source),
            settings,
            segmentation: Arc::new(SegmentationConfig::default()),
            today,
        }
    }

    /// Ask the source for read access to every metric the summary uses.
    pub async fn authorize(&self) -> Result<()> {
        let result = self
            .source
            .authorize(&HealthDataType::all_read_types())
            .await;

        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.authorization = AuthorizationStatus::Authorized;
                log_info!("health data access granted");
                Ok(())
            }
            Err(err) => {
                state.authorization = AuthorizationStatus::Denied;
                log_error!("health data authorization failed: {err:?}");
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        let visible = self.settings.visible_activities();
        self.state.lock().await.snapshot(&visible)
    }

    pub async fn selected_day(&self) -> NaiveDate {
        self.state.lock().await.selected_day
    }

    /// Manual refresh of the selected day.
    pub async fn refresh(&self) -> RefreshReport {
        let day = self.selected_day().await;
        self.refresh_day(day).await
    }

    pub async fn go_to_previous_day(&self) -> RefreshReport {
        let (day, generation) = {
            let mut state = self.state.lock().await;
            let day = state.previous_day();
            (day, state.select(day))
        };
        self.fetch_day(day, generation).await
    }

    /// `None` when the selected day is already today.
    pub async fn go_to_next_day(&self) -> Option<RefreshReport> {
        let (day, generation) = {
            let mut state = self.state.lock().await;
            let Some(day) = state.next_day((self.today)()) else {
                log_debug!("already at today; not moving forward");
                return None;
            };
            (day, state.select(day))
        };
        Some(self.fetch_day(day, generation).await)
    }

    /// Jump to a day picked from the calendar.
    pub async fn select_day(&self, day: NaiveDate) -> Result<RefreshReport> {
        if day > (self.today)() {
            bail!("cannot select {day}: it is in the future");
        }
        Ok(self.refresh_day(day).await)
    }

    /// Store new cycle settings and recompute the selected day with them.
    pub async fn update_cycle_settings(&self, settings: CycleSettings) -> Result<RefreshReport> {
        self.settings.update_cycle_settings(settings)?;
        Ok(self.refresh().await)
    }

    pub fn set_activity_visible(&self, key: ActivityKey, visible: bool) {
        self.settings.set_activity_visible(key, visible);
    }

    /// Make every activity currently on display visible.
    pub async fn show_all_activities(&self) {
        let keys: Vec<ActivityKey> = self.state.lock().await.activities.keys().copied().collect();
        self.settings.show_all(keys);
    }

    pub fn hide_all_activities(&self) {
        self.settings.hide_all();
    }

    /// Run [`Self::refresh_day`] on its own task.
    pub fn spawn_refresh(&self, day: NaiveDate) -> JoinHandle<RefreshReport> {
        let controller = self.clone();
        tokio::spawn(async move { controller.refresh_day(day).await })
    }

    /// Select `day` and fetch every metric for it concurrently.
    pub async fn refresh_day(&self, day: NaiveDate) -> RefreshReport {
        let generation = self.state.lock().await.select(day);
        self.fetch_day(day, generation).await
    }

    /// `generation` is `None` when access was denied and nothing may be fetched.
    async fn fetch_day(&self, day: NaiveDate, generation: Option<u64>) -> RefreshReport {
        let Some(generation) = generation else {
            log_debug!("skipping refresh for {day}: access denied");
            return RefreshReport::skipped(day);
        };

        log_info!("refreshing health data for {day} (generation {generation})");

        let range = DayRange::for_day(day);
        let mode = self.settings.cycle_mode();

        let (steps, flights, distance, sleep, heart_rate) = tokio::join!(
            self.fetch_aggregate(generation, QuantityMetric::StepCount, range),
            self.fetch_aggregate(generation, QuantityMetric::FlightsClimbed, range),
            self.fetch_aggregate(generation, QuantityMetric::DistanceWalkingRunning, range),
            self.fetch_sleep(generation, range, mode),
            self.fetch_heart_rate(generation, range),
        );

        let mut report = RefreshReport::new(day, generation);
        report.record(Metric::Steps, steps);
        report.record(Metric::Flights, flights);
        report.record(Metric::Distance, distance);
        report.record(Metric::Sleep, sleep);
        report.record(Metric::HeartRate, heart_rate);
        report
    }

    async fn fetch_aggregate(
        &self,
        generation: u64,
        metric: QuantityMetric,
        range: DayRange,
    ) -> FetchOutcome {
        let label = match metric {
            QuantityMetric::StepCount => Metric::Steps,
            QuantityMetric::FlightsClimbed => Metric::Flights,
            QuantityMetric::DistanceWalkingRunning => Metric::Distance,
        };

        let total = match self.source.query_aggregate(metric, range).await {
            Ok(total) => total.unwrap_or(0.0),
            Err(err) => {
                log_error!("error fetching {} for {}: {err:?}", label.as_str(), range.day);
                return FetchOutcome::Failed;
            }
        };

        let record = match metric {
            QuantityMetric::StepCount => steps_record(total),
            QuantityMetric::FlightsClimbed => flights_record(total),
            QuantityMetric::DistanceWalkingRunning => distance_record(total),
        };
        self.apply(generation, label, StateUpdate::Activity(record))
            .await
    }

    async fn fetch_sleep(&self, generation: u64, range: DayRange, mode: CycleMode) -> FetchOutcome {
        let raw = match self.source.query_sleep_samples(range).await {
            Ok(raw) => raw,
            Err(err) => {
                log_error!("error fetching sleep data for {}: {err:?}", range.day);
                return FetchOutcome::Failed;
            }
        };

        let timelines = segment_day(&raw, &self.segmentation);
        let summary = build_sleep_summary(&timelines, mode);
        if timelines.is_empty() {
            log_info!("no sleep data available for {}", range.day);
        } else {
            log_info!(
                "{} sleep sessions for {}: total {}, {} cycles",
                timelines.len(),
                range.day,
                summary.formatted_total(),
                summary.cycles
            );
        }

        let records = sleep_records(&summary);
        let update = StateUpdate::Sleep {
            timelines,
            summary,
            records,
        };
        self.apply(generation, Metric::Sleep, update).await
    }

    async fn fetch_heart_rate(&self, generation: u64, range: DayRange) -> FetchOutcome {
        let samples = match self.source.query_heart_rate(range).await {
            Ok(samples) => samples,
            Err(err) => {
                log_error!("error fetching heart rate data for {}: {err:?}", range.day);
                return FetchOutcome::Failed;
            }
        };

        let summary = summarize_heart_rate(&samples);
        let records = match &summary {
            Some(summary) => {
                log_info!(
                    "heart rate for {}: min {}, max {}, avg {}",
                    range.day,
                    summary.min_bpm,
                    summary.max_bpm,
                    summary.avg_bpm
                );
                heart_rate_records(summary)
            }
            None => {
                log_info!("no heart rate data found for {}", range.day);
                Vec::new()
            }
        };

        self.apply(generation, Metric::HeartRate, StateUpdate::HeartRate { summary, records })
            .await
    }

    async fn apply(&self, generation: u64, metric: Metric, update: StateUpdate) -> FetchOutcome {
        let mut state = self.state.lock().await;
        if state.apply(generation, update) {
            FetchOutcome::Applied
        } else {
            log_warn!(
                "dropping stale {} result (generation {generation}, current {})",
                metric.as_str(),
                state.generation
            );
            FetchOutcome::Stale
        }
    }
}
