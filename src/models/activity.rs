//! Display-facing activity records.
//!
//! Every metric the summary produces is published under a stable
//! [`ActivityKey`]; the presentation layer orders cards by `id`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityKey {
    #[serde(rename = "todaySteps")]
    Steps,
    #[serde(rename = "todaysFlights")]
    Flights,
    #[serde(rename = "todaysDistance")]
    Distance,
    #[serde(rename = "todaysSleep")]
    Sleep,
    #[serde(rename = "todaysSleepCycles")]
    SleepCycles,
    #[serde(rename = "todaysREM")]
    Rem,
    #[serde(rename = "todaysDeep")]
    Deep,
    #[serde(rename = "todaysCore")]
    Core,
    #[serde(rename = "todaysAwake")]
    Awake,
    #[serde(rename = "minHeartRate")]
    MinHeartRate,
    #[serde(rename = "maxHeartRate")]
    MaxHeartRate,
    #[serde(rename = "avgHeartRate")]
    AvgHeartRate,
}

impl ActivityKey {
    pub const ALL: [ActivityKey; 12] = [
        ActivityKey::Steps,
        ActivityKey::Flights,
        ActivityKey::Distance,
        ActivityKey::Sleep,
        ActivityKey::SleepCycles,
        ActivityKey::Rem,
        ActivityKey::Deep,
        ActivityKey::Core,
        ActivityKey::Awake,
        ActivityKey::MinHeartRate,
        ActivityKey::MaxHeartRate,
        ActivityKey::AvgHeartRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKey::Steps => "todaySteps",
            ActivityKey::Flights => "todaysFlights",
            ActivityKey::Distance => "todaysDistance",
            ActivityKey::Sleep => "todaysSleep",
            ActivityKey::SleepCycles => "todaysSleepCycles",
            ActivityKey::Rem => "todaysREM",
            ActivityKey::Deep => "todaysDeep",
            ActivityKey::Core => "todaysCore",
            ActivityKey::Awake => "todaysAwake",
            ActivityKey::MinHeartRate => "minHeartRate",
            ActivityKey::MaxHeartRate => "maxHeartRate",
            ActivityKey::AvgHeartRate => "avgHeartRate",
        }
    }

    /// Display order of the card.
    pub fn id(&self) -> u32 {
        match self {
            ActivityKey::Steps => 0,
            ActivityKey::Flights => 1,
            ActivityKey::Distance => 2,
            ActivityKey::Sleep => 3,
            ActivityKey::SleepCycles => 4,
            ActivityKey::Rem => 5,
            ActivityKey::Deep => 6,
            ActivityKey::Core => 7,
            ActivityKey::Awake => 8,
            ActivityKey::MinHeartRate => 9,
            ActivityKey::MaxHeartRate => 10,
            ActivityKey::AvgHeartRate => 11,
        }
    }

    /// Cards shown before the user touches the filter.
    pub fn default_visible() -> Vec<ActivityKey> {
        vec![
            ActivityKey::Sleep,
            ActivityKey::SleepCycles,
            ActivityKey::Rem,
            ActivityKey::Deep,
            ActivityKey::Core,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityColor {
    Green,
    Purple,
    Blue,
    Teal,
    Orange,
    Mint,
    Red,
    Indigo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: u32,
    pub key: ActivityKey,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub amount: String,
    pub color: ActivityColor,
}

impl ActivityRecord {
    pub fn new(
        key: ActivityKey,
        title: &str,
        subtitle: &str,
        image: &str,
        amount: String,
        color: ActivityColor,
    ) -> Self {
        Self {
            id: key.id(),
            key,
            title: title.into(),
            subtitle: subtitle.into(),
            image: image.into(),
            amount,
            color,
        }
    }
}
