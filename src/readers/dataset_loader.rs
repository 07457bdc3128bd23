use crate::error::Result;
use crate::models::{Dataset, ForecastRecord, HistoricalAqi, LiveObservation};
use crate::readers::TableReader;
use crate::settings::DataSettings;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::info;

/// Locations of the three source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub live: PathBuf,
    pub aqi_history: PathBuf,
    pub forecast: PathBuf,
}

impl DataPaths {
    pub fn new(live: &Path, aqi_history: &Path, forecast: &Path) -> Self {
        Self {
            live: live.to_path_buf(),
            aqi_history: aqi_history.to_path_buf(),
            forecast: forecast.to_path_buf(),
        }
    }
}

impl From<&DataSettings> for DataPaths {
    fn from(settings: &DataSettings) -> Self {
        Self::new(
            &settings.live_path,
            &settings.aqi_history_path,
            &settings.forecast_path,
        )
    }
}

/// Loads the dataset, reading the three tables concurrently.
pub struct DatasetLoader {
    paths: DataPaths,
    reader: TableReader,
}

impl DatasetLoader {
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths,
            reader: TableReader::new(),
        }
    }

    pub fn from_settings(settings: &DataSettings) -> Self {
        Self::new(DataPaths::from(settings)).with_reader(TableReader::new().with_mmap(settings.use_mmap))
    }

    pub fn with_reader(mut self, reader: TableReader) -> Self {
        self.reader = reader;
        self
    }

    /// Read all three tables
    pub async fn load(&self) -> Result<Dataset> {
        let reader = self.reader;

        let live_path = self.paths.live.clone();
        let aqi_path = self.paths.aqi_history.clone();
        let forecast_path = self.paths.forecast.clone();

        let live_handle: JoinHandle<Result<Vec<LiveObservation>>> =
            tokio::task::spawn_blocking(move || reader.read_live(&live_path));

        let aqi_handle: JoinHandle<Result<Vec<HistoricalAqi>>> =
            tokio::task::spawn_blocking(move || reader.read_aqi_history(&aqi_path));

        let forecast_handle: JoinHandle<Result<Vec<ForecastRecord>>> =
            tokio::task::spawn_blocking(move || reader.read_forecast(&forecast_path));

        // Wait for all reads to complete
        let (live, aqi_history, forecast) =
            tokio::try_join!(live_handle, aqi_handle, forecast_handle)?;

        let dataset = Dataset::new(live?, aqi_history?, forecast?);

        info!(
            live = dataset.live().len(),
            aqi_history = dataset.aqi_history().len(),
            forecast = dataset.forecast().len(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Re-read only the live table, keeping the reference tables of `current`
    pub async fn reload_live(&self, current: &Dataset) -> Result<Dataset> {
        let reader = self.reader;
        let live_path = self.paths.live.clone();

        let live = tokio::task::spawn_blocking(move || reader.read_live(&live_path)).await??;

        info!(
            previous = current.live().len(),
            current = live.len(),
            "Live observations reloaded"
        );

        Ok(current.with_live(live))
    }
}
