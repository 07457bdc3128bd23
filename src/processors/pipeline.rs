use crate::error::Result;
use crate::models::{
    CurrentConditions, Dataset, ForecastPoint, HeatmapGrid, HourlyPoint, Pollutant,
    StateTemperature,
};
use crate::processors::{forecast, heatmap, live_metrics};
use std::sync::Arc;

/// Read-only query surface over a loaded [`Dataset`].
///
/// Cloning is cheap; every clone shares the same tables. Each query re-filters
/// the tables and returns a fresh result.
#[derive(Debug, Clone)]
pub struct AggregationPipeline {
    dataset: Arc<Dataset>,
}

impl AggregationPipeline {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(Arc::new(dataset))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// States offered for selection
    pub fn states(&self) -> Vec<String> {
        self.dataset.states()
    }

    pub fn latest_reading(&self, state: &str) -> Result<CurrentConditions> {
        live_metrics::latest_reading(self.dataset.live(), state)
    }

    pub fn hourly_series(&self, state: &str) -> Result<Vec<HourlyPoint>> {
        live_metrics::hourly_series(self.dataset.live(), state)
    }

    pub fn forecast_series(&self, state: &str) -> Result<Vec<ForecastPoint>> {
        forecast::forecast_series(self.dataset.forecast(), state)
    }

    pub fn month_day_heatmap(&self, state: &str, pollutant: Pollutant) -> Result<HeatmapGrid> {
        heatmap::month_day_heatmap(self.dataset.aqi_history(), state, pollutant)
    }

    pub fn month_day_heatmap_by_code(&self, state: &str, pollutant: &str) -> Result<HeatmapGrid> {
        heatmap::month_day_heatmap_by_code(self.dataset.aqi_history(), state, pollutant)
    }

    pub fn state_temperatures(&self) -> Vec<StateTemperature> {
        live_metrics::state_temperatures(self.dataset.live())
    }
}
