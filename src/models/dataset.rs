use std::collections::BTreeSet;
use std::sync::Arc;

use super::{ForecastRecord, HistoricalAqi, LiveObservation};

/// The three tables the pipeline reads, loaded once and never mutated.
///
/// The live table is the only one that changes during a session; a refresh
/// builds a new `Dataset` through [`Dataset::with_live`], sharing the
/// historical and forecast tables with the old one.
#[derive(Debug, Clone)]
pub struct Dataset {
    live: Vec<LiveObservation>,
    aqi_history: Arc<[HistoricalAqi]>,
    forecast: Arc<[ForecastRecord]>,
}

impl Dataset {
    pub fn new(
        live: Vec<LiveObservation>,
        aqi_history: Vec<HistoricalAqi>,
        forecast: Vec<ForecastRecord>,
    ) -> Self {
        Self {
            live,
            aqi_history: aqi_history.into(),
            forecast: forecast.into(),
        }
    }

    pub fn live(&self) -> &[LiveObservation] {
        &self.live
    }

    pub fn aqi_history(&self) -> &[HistoricalAqi] {
        &self.aqi_history
    }

    pub fn forecast(&self) -> &[ForecastRecord] {
        &self.forecast
    }

    /// Copy of this dataset with the live table replaced.
    pub fn with_live(&self, live: Vec<LiveObservation>) -> Self {
        Self {
            live,
            aqi_history: Arc::clone(&self.aqi_history),
            forecast: Arc::clone(&self.forecast),
        }
    }

    /// Distinct state names of the live table, sorted, for the selection list.
    pub fn states(&self) -> Vec<String> {
        self.live
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(state: &str, city: &str) -> LiveObservation {
        let at = NaiveDate::from_ymd_opt(2023, 7, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        LiveObservation::new(state, city, "10:00", 70.0, 70.0, "clear sky", None, at)
    }

    #[test]
    fn test_states_sorted_and_distinct() {
        let dataset = Dataset::new(
            vec![obs("Texas", "Austin"), obs("Ohio", "Columbus"), obs("Texas", "Dallas")],
            vec![],
            vec![],
        );

        assert_eq!(dataset.states(), vec!["Ohio".to_string(), "Texas".to_string()]);
    }

    #[test]
    fn test_with_live_keeps_reference_tables() {
        let dataset = Dataset::new(
            vec![obs("Ohio", "Columbus")],
            vec![HistoricalAqi::new("Ohio", "Columbus", 1, 1)],
            vec![],
        );

        let refreshed = dataset.with_live(vec![obs("Texas", "Austin"), obs("Texas", "Dallas")]);

        assert_eq!(refreshed.live().len(), 2);
        assert_eq!(refreshed.aqi_history().len(), 1);
        assert_eq!(dataset.live().len(), 1);
        assert!(Arc::ptr_eq(&refreshed.aqi_history, &dataset.aqi_history));
        assert!(Arc::ptr_eq(&refreshed.forecast, &dataset.forecast));
    }
}
