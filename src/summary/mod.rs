pub mod activities;
pub mod builder;

pub use activities::{
    distance_record, flights_record, heart_rate_records, sleep_records, steps_record,
};
pub use builder::{
    build_sleep_summary, format_sleep_duration, summarize_heart_rate, summarize_sleep,
    HeartRateSummary, SleepSummary,
};
