pub mod health;
pub mod models;
pub mod segmentation;
pub mod settings;
pub mod source;
pub mod summary;
mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use chrono::NaiveDate;
use log::{info, warn};

use health::HealthController;
use settings::SettingsStore;
use source::SyntheticSource;

/// Path of the optional JSON settings file.
const CONFIG_ENV: &str = "TEDDY_CONFIG";

/// Demo entry point: summarise one day from the synthetic source and print
/// the published snapshot as JSON.
///
/// An optional `YYYY-MM-DD` argument picks the day; otherwise today is used.
pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("teddy starting up...");

    let settings = match std::env::var_os(CONFIG_ENV) {
        Some(path) => SettingsStore::load(&PathBuf::from(path))?,
        None => SettingsStore::new(),
    };

    let day = std::env::args()
        .nth(1)
        .map(|arg| {
            NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
                .with_context(|| format!("invalid day '{arg}', expected YYYY-MM-DD"))
        })
        .transpose()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let snapshot = runtime.block_on(async move {
        let controller = HealthController::new(SyntheticSource::new(), Arc::new(settings));

        if let Err(err) = controller.authorize().await {
            warn!("continuing without health data: {err}");
        }

        let report = match day {
            Some(day) => controller.select_day(day).await?,
            None => controller.refresh().await,
        };
        info!(
            "refresh for {} finished: {} applied, {} failed",
            report.day,
            report.applied.len(),
            report.failed.len()
        );

        Ok::<_, anyhow::Error>(controller.snapshot().await)
    })?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
