//! Value types shared by segmentation, summary and the refresh controller.

pub mod activity;
pub mod sample;
pub mod segment;

pub use activity::{ActivityColor, ActivityKey, ActivityRecord};
pub use sample::{sleep_value, HeartRateSample, RawSleepSample, SleepSample, SleepStage};
pub use segment::{Segment, Session, Timeline};
