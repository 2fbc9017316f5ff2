use chrono::Duration;

/// Configuration for sleep segmentation with tunable thresholds.
#[derive(Debug, Clone)]
pub struct SegmentationConfig {
    /// A gap longer than this between consecutive samples starts a new session
    pub session_gap_secs: i64,

    /// Only samples whose source bundle id starts with this prefix are trusted
    pub trusted_source_prefix: String,
}

impl SegmentationConfig {
    pub fn session_gap(&self) -> Duration {
        Duration::seconds(self.session_gap_secs)
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            session_gap_secs: 30 * 60,
            trusted_source_prefix: "com.apple.health".into(),
        }
    }
}
