use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ActivityKey, ActivityRecord, Timeline};
use crate::summary::{HeartRateSummary, SleepSummary};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    NotDetermined,
    Authorized,
    Denied,
}

impl Default for AuthorizationStatus {
    fn default() -> Self {
        AuthorizationStatus::NotDetermined
    }
}

/// The independent fetches issued for one day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Steps,
    Flights,
    Distance,
    Sleep,
    HeartRate,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Flights => "flights",
            Metric::Distance => "distance",
            Metric::Sleep => "sleep",
            Metric::HeartRate => "heart rate",
        }
    }
}

/// A completed fetch's contribution. Each variant touches a disjoint part of
/// the state.
#[derive(Debug, Clone)]
pub enum StateUpdate {
    Activity(ActivityRecord),
    Sleep {
        timelines: Vec<Timeline>,
        summary: SleepSummary,
        records: Vec<ActivityRecord>,
    },
    HeartRate {
        summary: Option<HeartRateSummary>,
        records: Vec<ActivityRecord>,
    },
}

const HEART_RATE_KEYS: [ActivityKey; 3] = [
    ActivityKey::MinHeartRate,
    ActivityKey::MaxHeartRate,
    ActivityKey::AvgHeartRate,
];

/// Everything the presentation layer reads, owned by the refresh controller.
#[derive(Debug, Clone)]
pub struct HealthState {
    pub authorization: AuthorizationStatus,
    pub selected_day: NaiveDate,
    /// Bumped on every refresh; updates carrying an older value are dropped.
    pub generation: u64,
    pub activities: BTreeMap<ActivityKey, ActivityRecord>,
    pub sleep_sessions: Vec<Timeline>,
    pub sleep_summary: Option<SleepSummary>,
    pub heart_rate: Option<HeartRateSummary>,
    pub available_sleep_dates: BTreeSet<NaiveDate>,
}

impl HealthState {
    pub fn new(selected_day: NaiveDate) -> Self {
        Self {
            authorization: AuthorizationStatus::default(),
            selected_day,
            generation: 0,
            activities: BTreeMap::new(),
            sleep_sessions: Vec::new(),
            sleep_summary: None,
            heart_rate: None,
            available_sleep_dates: BTreeSet::new(),
        }
    }

    /// Start a refresh for `day` and return the generation its fetches must carry.
    ///
    /// Moving to a different day drops everything derived from the old one.
    pub fn begin_refresh(&mut self, day: NaiveDate) -> u64 {
        self.move_to(day);
        self.generation += 1;
        self.generation
    }

    /// Move the cursor to `day` and, unless access was denied, start a
    /// refresh for it.
    pub fn select(&mut self, day: NaiveDate) -> Option<u64> {
        if self.authorization == AuthorizationStatus::Denied {
            self.move_to(day);
            return None;
        }
        Some(self.begin_refresh(day))
    }

    fn move_to(&mut self, day: NaiveDate) {
        if day != self.selected_day {
            self.clear_day();
            self.selected_day = day;
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Apply an update if it belongs to the current generation.
    pub fn apply(&mut self, generation: u64, update: StateUpdate) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        match update {
            StateUpdate::Activity(record) => {
                self.activities.insert(record.key, record);
            }
            StateUpdate::Sleep {
                timelines,
                summary,
                records,
            } => {
                if !timelines.is_empty() {
                    self.available_sleep_dates.insert(self.selected_day);
                }
                self.sleep_sessions = timelines;
                self.sleep_summary = Some(summary);
                for record in records {
                    self.activities.insert(record.key, record);
                }
            }
            StateUpdate::HeartRate { summary, records } => {
                self.heart_rate = summary;
                for key in HEART_RATE_KEYS {
                    self.activities.remove(&key);
                }
                for record in records {
                    self.activities.insert(record.key, record);
                }
            }
        }
        true
    }

    pub fn previous_day(&self) -> NaiveDate {
        self.selected_day - Duration::days(1)
    }

    /// The next day, unless it would be after `today`.
    pub fn next_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        let tomorrow = self.selected_day + Duration::days(1);
        (tomorrow <= today).then_some(tomorrow)
    }

    pub fn snapshot(&self, visible: &BTreeSet<ActivityKey>) -> HealthSnapshot {
        HealthSnapshot {
            authorization: self.authorization,
            selected_day: self.selected_day,
            generation: self.generation,
            activities: self.activities.clone(),
            visible_activities: self
                .activities
                .values()
                .filter(|record| visible.contains(&record.key))
                .cloned()
                .collect(),
            sleep_sessions: self.sleep_sessions.clone(),
            sleep_summary: self.sleep_summary.clone(),
            heart_rate: self.heart_rate,
            available_sleep_dates: self.available_sleep_dates.iter().copied().collect(),
        }
    }

    fn clear_day(&mut self) {
        self.activities.clear();
        self.sleep_sessions.clear();
        self.sleep_summary = None;
        self.heart_rate = None;
    }
}

/// A consistent copy of [`HealthState`] for readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub authorization: AuthorizationStatus,
    pub selected_day: NaiveDate,
    pub generation: u64,
    pub activities: BTreeMap<ActivityKey, ActivityRecord>,
    /// Records the user has not hidden, ordered by card id
    pub visible_activities: Vec<ActivityRecord>,
    pub sleep_sessions: Vec<Timeline>,
    pub sleep_summary: Option<SleepSummary>,
    pub heart_rate: Option<HeartRateSummary>,
    pub available_sleep_dates: Vec<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Segment, SleepStage};
    use crate::summary::{heart_rate_records, steps_record};
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn one_session() -> Vec<Timeline> {
        let start = Utc.with_ymd_and_hms(2025, 6, 11, 1, 0, 0).unwrap();
        vec![vec![Segment::new(
            SleepStage::Core,
            start,
            start + Duration::minutes(30),
        )]]
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut state = HealthState::new(day(11));
        let first = state.begin_refresh(day(10));
        let second = state.begin_refresh(day(11));
        assert!(second > first);

        assert!(!state.apply(first, StateUpdate::Activity(steps_record(100.0))));
        assert!(state.activities.is_empty());

        assert!(state.apply(second, StateUpdate::Activity(steps_record(200.0))));
        assert_eq!(state.activities[&ActivityKey::Steps].amount, "200");
    }

    #[test]
    fn test_day_change_clears_previous_day() {
        let mut state = HealthState::new(day(11));
        let generation = state.begin_refresh(day(11));
        state.apply(generation, StateUpdate::Activity(steps_record(5_000.0)));
        state.apply(
            generation,
            StateUpdate::Sleep {
                timelines: one_session(),
                summary: SleepSummary::default(),
                records: Vec::new(),
            },
        );
        assert_eq!(state.available_sleep_dates.len(), 1);

        // Same-day refresh keeps what is already shown
        state.begin_refresh(day(11));
        assert!(!state.activities.is_empty());

        state.begin_refresh(day(10));
        assert!(state.activities.is_empty());
        assert!(state.sleep_sessions.is_empty());
        assert!(state.sleep_summary.is_none());
        // Calendar markers survive navigation
        assert!(state.available_sleep_dates.contains(&day(11)));
    }

    #[test]
    fn test_empty_sleep_does_not_mark_day_available() {
        let mut state = HealthState::new(day(11));
        let generation = state.begin_refresh(day(11));
        state.apply(
            generation,
            StateUpdate::Sleep {
                timelines: Vec::new(),
                summary: SleepSummary::default(),
                records: Vec::new(),
            },
        );
        assert!(state.available_sleep_dates.is_empty());
        assert!(state.sleep_summary.is_some());
    }

    #[test]
    fn test_missing_heart_rate_removes_old_records() {
        let mut state = HealthState::new(day(11));
        let generation = state.begin_refresh(day(11));
        let summary = HeartRateSummary {
            min_bpm: 50,
            max_bpm: 80,
            avg_bpm: 60,
        };
        state.apply(
            generation,
            StateUpdate::HeartRate {
                summary: Some(summary),
                records: heart_rate_records(&summary),
            },
        );
        assert_eq!(state.activities.len(), 3);

        let generation = state.begin_refresh(day(11));
        state.apply(
            generation,
            StateUpdate::HeartRate {
                summary: None,
                records: Vec::new(),
            },
        );
        assert!(state.activities.is_empty());
        assert!(state.heart_rate.is_none());
    }

    #[test]
    fn test_select_moves_cursor_even_when_denied() {
        let mut state = HealthState::new(day(11));
        assert_eq!(state.select(day(10)), Some(1));

        state.authorization = AuthorizationStatus::Denied;
        assert_eq!(state.select(day(9)), None);
        assert_eq!(state.selected_day, day(9));
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_next_day_never_passes_today() {
        let state = HealthState::new(day(11));
        assert_eq!(state.next_day(day(11)), None);
        assert_eq!(state.next_day(day(12)), Some(day(12)));
        assert_eq!(state.previous_day(), day(10));
    }

    #[test]
    fn test_snapshot_filters_visible_in_id_order() {
        let mut state = HealthState::new(day(11));
        let generation = state.begin_refresh(day(11));
        let summary = HeartRateSummary {
            min_bpm: 50,
            max_bpm: 80,
            avg_bpm: 60,
        };
        state.apply(
            generation,
            StateUpdate::HeartRate {
                summary: Some(summary),
                records: heart_rate_records(&summary),
            },
        );
        state.apply(generation, StateUpdate::Activity(steps_record(10.0)));

        let visible: BTreeSet<ActivityKey> =
            [ActivityKey::AvgHeartRate, ActivityKey::Steps].into_iter().collect();
        let snapshot = state.snapshot(&visible);
        let keys: Vec<ActivityKey> = snapshot.visible_activities.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![ActivityKey::Steps, ActivityKey::AvgHeartRate]);
        assert_eq!(snapshot.activities.len(), 4);
    }
}
