pub mod algorithm;
pub mod config;
pub mod cycles;
pub mod merge;

pub use algorithm::{filter_samples, group_sessions, segment_day};
pub use config::SegmentationConfig;
pub use cycles::{estimate_cycles, CycleMode};
pub use merge::reconcile_timeline;
