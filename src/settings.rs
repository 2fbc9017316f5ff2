use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path, sync::RwLock};

use crate::models::ActivityKey;
use crate::segmentation::CycleMode;

pub const MIN_CYCLE_MINUTES: u32 = 60;
pub const MAX_CYCLE_MINUTES: u32 = 120;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleSettings {
    pub use_pattern_based_cycles: bool,
    pub average_cycle_minutes: u32,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            use_pattern_based_cycles: true,
            average_cycle_minutes: 90,
        }
    }
}

impl CycleSettings {
    pub fn mode(&self) -> CycleMode {
        if self.use_pattern_based_cycles {
            CycleMode::Pattern
        } else {
            CycleMode::Duration {
                average_cycle_minutes: self.average_cycle_minutes,
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_CYCLE_MINUTES..=MAX_CYCLE_MINUTES).contains(&self.average_cycle_minutes) {
            bail!(
                "average cycle length must be between {} and {} minutes, got {}",
                MIN_CYCLE_MINUTES,
                MAX_CYCLE_MINUTES,
                self.average_cycle_minutes
            );
        }
        Ok(())
    }

    fn clamped(mut self) -> Self {
        self.average_cycle_minutes = self
            .average_cycle_minutes
            .clamp(MIN_CYCLE_MINUTES, MAX_CYCLE_MINUTES);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    cycles: CycleSettings,
    visible_activities: BTreeSet<ActivityKey>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            cycles: CycleSettings::default(),
            visible_activities: ActivityKey::default_visible().into_iter().collect(),
        }
    }
}

/// In-memory user preferences, optionally seeded from a JSON file.
///
/// Nothing is written back; the file is configuration, not storage.
pub struct SettingsStore {
    data: RwLock<UserSettings>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            data: RwLock::new(UserSettings::default()),
        }
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing file -> defaults. Unparseable file -> defaults with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str::<UserSettings>(&contents) {
                Ok(mut parsed) => {
                    let clamped = parsed.cycles.clamped();
                    if clamped != parsed.cycles {
                        warn!(
                            "averageCycleMinutes {} in {} is outside {}..={}, using {}",
                            parsed.cycles.average_cycle_minutes,
                            path.display(),
                            MIN_CYCLE_MINUTES,
                            MAX_CYCLE_MINUTES,
                            clamped.average_cycle_minutes
                        );
                    }
                    parsed.cycles = clamped;
                    parsed
                }
                Err(err) => {
                    warn!("Ignoring malformed settings in {}: {err}", path.display());
                    UserSettings::default()
                }
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            data: RwLock::new(data),
        })
    }

    pub fn cycle_settings(&self) -> CycleSettings {
        self.read(|data| data.cycles)
    }

    pub fn cycle_mode(&self) -> CycleMode {
        self.cycle_settings().mode()
    }

    /// Rejects out-of-range cycle lengths and leaves the current value alone.
    pub fn update_cycle_settings(&self, settings: CycleSettings) -> Result<()> {
        settings.validate()?;
        self.write(|data| data.cycles = settings);
        Ok(())
    }

    pub fn visible_activities(&self) -> BTreeSet<ActivityKey> {
        self.read(|data| data.visible_activities.clone())
    }

    pub fn set_activity_visible(&self, key: ActivityKey, visible: bool) {
        self.write(|data| {
            if visible {
                data.visible_activities.insert(key);
            } else {
                data.visible_activities.remove(&key);
            }
        });
    }

    pub fn show_all<I: IntoIterator<Item = ActivityKey>>(&self, keys: I) {
        let keys: BTreeSet<ActivityKey> = keys.into_iter().collect();
        self.write(|data| data.visible_activities = keys);
    }

    pub fn hide_all(&self) {
        self.write(|data| data.visible_activities.clear());
    }

    fn read<T>(&self, f: impl FnOnce(&UserSettings) -> T) -> T {
        let guard = match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut UserSettings)) {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}
