use crate::error::{PipelineError, Result};
use crate::models::{DashboardSnapshot, Dataset, HeatmapGrid, Pollutant};
use crate::processors::AggregationPipeline;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fans a state selection out to every chart query.
///
/// Queries run on a dedicated rayon pool: the six heatmaps in parallel,
/// alongside the indicator, hourly and forecast series.
pub struct Dashboard {
    pipeline: AggregationPipeline,
    pool: rayon::ThreadPool,
}

impl Dashboard {
    pub fn new(pipeline: AggregationPipeline, max_workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        Ok(Self { pipeline, pool })
    }

    pub fn pipeline(&self) -> &AggregationPipeline {
        &self.pipeline
    }

    /// Swap in a freshly loaded dataset, e.g. after a live reload
    pub fn replace_dataset(&mut self, dataset: Arc<Dataset>) {
        self.pipeline = AggregationPipeline::new(dataset);
    }

    /// Recompute every series for `state`.
    ///
    /// A table without rows for the state yields an empty chart; any other
    /// failure is returned.
    pub fn on_selection_changed(&self, state: &str) -> Result<DashboardSnapshot> {
        debug!(state, "Selection changed");
        let pipeline = &self.pipeline;

        let ((current, hourly), (forecast, heatmaps)) = self.pool.install(|| {
            rayon::join(
                || {
                    rayon::join(
                        || pipeline.latest_reading(state),
                        || pipeline.hourly_series(state),
                    )
                },
                || {
                    rayon::join(
                        || pipeline.forecast_series(state),
                        || {
                            Pollutant::ALL
                                .par_iter()
                                .map(|p| pipeline.month_day_heatmap(state, *p))
                                .collect::<Vec<Result<HeatmapGrid>>>()
                        },
                    )
                },
            )
        });

        let mut grids = BTreeMap::new();
        for grid in heatmaps {
            if let Some(grid) = or_empty(grid, state, "heatmap")? {
                grids.insert(grid.pollutant, grid);
            }
        }

        Ok(DashboardSnapshot {
            state: state.to_string(),
            current: or_empty(current, state, "indicator")?,
            hourly: or_empty(hourly, state, "hourly")?.unwrap_or_default(),
            forecast: or_empty(forecast, state, "forecast")?.unwrap_or_default(),
            heatmaps: grids,
        })
    }
}

fn or_empty<T>(result: Result<T>, state: &str, chart: &'static str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            warn!(state, chart, "No data for chart: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastRecord, HistoricalAqi, LiveObservation};
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let at = |hour: u32| {
            NaiveDate::from_ymd_opt(2023, 7, 15)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap()
        };

        let live = vec![
            LiveObservation::new("Ohio", "Columbus", "01:00", 68.0, 67.0, "mist", Some(3.0), at(1)),
            LiveObservation::new("Ohio", "Columbus", "05:00", 70.0, 69.5, "clear sky", Some(4.0), at(5)),
            LiveObservation::new("Texas", "Austin", "05:00", 88.0, 92.0, "haze", None, at(5)),
        ];
        let aqi = vec![
            HistoricalAqi::new("Ohio", "Columbus", 1, 1)
                .with_value(Pollutant::Pm25, Some(12.0))
                .with_value(Pollutant::O3, Some(30.0)),
            HistoricalAqi::new("Ohio", "Columbus", 1, 2),
        ];
        let forecast = vec![ForecastRecord::new("Ohio", at(12), 75.0)];

        Dataset::new(live, aqi, forecast)
    }

    #[test]
    fn test_snapshot_for_complete_state() {
        let dashboard = Dashboard::new(AggregationPipeline::from_dataset(dataset()), 2).unwrap();

        let snapshot = dashboard.on_selection_changed("Ohio").unwrap();

        assert_eq!(snapshot.state, "Ohio");
        assert_eq!(snapshot.current.as_ref().map(|c| c.temperature), Some(70.0));
        assert_eq!(snapshot.hourly.len(), 2);
        assert_eq!(snapshot.forecast.len(), 1);
        assert_eq!(snapshot.heatmaps.len(), 6);
        assert_eq!(snapshot.heatmaps[&Pollutant::Pm25].get("Jan", 1), Some(12.0));
        assert_eq!(snapshot.heatmaps[&Pollutant::Pm25].get("Jan", 2), Some(0.0));
        assert_eq!(snapshot.heatmaps[&Pollutant::O3].get("Jan", 1), Some(30.0));
    }

    #[test]
    fn test_missing_tables_become_empty_charts() {
        let dashboard = Dashboard::new(AggregationPipeline::from_dataset(dataset()), 2).unwrap();

        let snapshot = dashboard.on_selection_changed("Texas").unwrap();

        assert_eq!(snapshot.current.as_ref().map(|c| c.city.as_str()), Some("Austin"));
        assert_eq!(snapshot.hourly.len(), 1);
        assert!(snapshot.forecast.is_empty());
        assert!(snapshot.heatmaps.is_empty());

        let snapshot = dashboard.on_selection_changed("Atlantis").unwrap();
        assert!(snapshot.current.is_none());
        assert!(snapshot.hourly.is_empty());
    }

    #[test]
    fn test_other_errors_propagate() {
        let mut data = dataset();
        data = data.with_live(vec![LiveObservation::new(
            "Ohio",
            "Columbus",
            "?",
            70.0,
            70.0,
            "clear sky",
            None,
            NaiveDate::from_ymd_opt(2023, 7, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )]);
        let dashboard = Dashboard::new(AggregationPipeline::from_dataset(data), 2).unwrap();

        assert!(matches!(
            dashboard.on_selection_changed("Ohio"),
            Err(PipelineError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_selection_is_idempotent() {
        let dashboard = Dashboard::new(AggregationPipeline::from_dataset(dataset()), 4).unwrap();

        let first = dashboard.on_selection_changed("Ohio").unwrap();
        let second = dashboard.on_selection_changed("Ohio").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_replace_dataset() {
        let mut dashboard = Dashboard::new(AggregationPipeline::from_dataset(dataset()), 1).unwrap();
        let refreshed = dashboard.pipeline().dataset().with_live(vec![]);

        dashboard.replace_dataset(Arc::new(refreshed));

        assert!(dashboard.pipeline().states().is_empty());
        assert!(dashboard.on_selection_changed("Ohio").unwrap().current.is_none());
    }
}
