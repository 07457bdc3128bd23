//! Layered settings: built-in defaults, an optional TOML file, then
//! `STATE_WEATHER__`-prefixed environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{
    AQI_HISTORY_FILE, CONFIG_FILE, DEFAULT_DATA_DIR, DEFAULT_STATE, ENV_PREFIX, FORECAST_FILE,
    LIVE_FILE,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub data: DataSettings,

    #[validate(nested)]
    pub dashboard: DashboardSettings,

    #[validate(range(min = 1))]
    pub max_workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub live_path: PathBuf,
    pub aqi_history_path: PathBuf,
    pub forecast_path: PathBuf,
    /// Memory-map the historical AQI file instead of buffered reads
    pub use_mmap: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DashboardSettings {
    #[validate(length(min = 1))]
    pub default_state: String,
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise `state-weather.toml`
    /// in the working directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let data_dir = Path::new(DEFAULT_DATA_DIR);

        let builder = Config::builder()
            .set_default("data.live_path", path_default(&data_dir.join(LIVE_FILE)))?
            .set_default(
                "data.aqi_history_path",
                path_default(&data_dir.join(AQI_HISTORY_FILE)),
            )?
            .set_default("data.forecast_path", path_default(&data_dir.join(FORECAST_FILE)))?
            .set_default("data.use_mmap", false)?
            .set_default("dashboard.default_state", DEFAULT_STATE)?
            .set_default("max_workers", num_cpus::get() as i64)?;

        let builder = match path {
            Some(p) => builder.add_source(File::from(p)),
            None => builder.add_source(File::with_name(CONFIG_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        tracing::debug!(?settings, "Loaded settings");

        Ok(settings)
    }
}

fn path_default(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
