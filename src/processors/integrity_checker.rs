use crate::models::{Dataset, Pollutant};
use crate::utils::calendar::month_abbr;
use crate::utils::constants::{AQI_TABLE, FORECAST_TABLE, LIVE_TABLE};
use crate::utils::us_states::is_us_state;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub live_rows: usize,
    pub aqi_rows: usize,
    pub forecast_rows: usize,
    pub violations: Vec<DataViolation>,
    /// States selectable from the live table but absent from another table
    pub states_without_aqi: Vec<String>,
    pub states_without_forecast: Vec<String>,
    pub null_pollutants: BTreeMap<Pollutant, usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataViolation {
    pub table: &'static str,
    /// 0-based position in the table
    pub row: usize,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    UnknownState,
    InvalidUtcTime,
    MonthOutOfRange,
    DayOutOfRange,
    ForecastOutOfOrder,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

/// Checks the loaded tables against the dataset invariants: consistent U.S.
/// state names, parsable hours, calendar-valid month/day, and chronological
/// forecasts.
pub struct IntegrityChecker {
    max_listed_violations: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            max_listed_violations: 10,
        }
    }

    pub fn with_max_listed_violations(max_listed_violations: usize) -> Self {
        Self {
            max_listed_violations,
        }
    }

    pub fn check_integrity(&self, dataset: &Dataset) -> IntegrityReport {
        let mut report = IntegrityReport {
            live_rows: dataset.live().len(),
            aqi_rows: dataset.aqi_history().len(),
            forecast_rows: dataset.forecast().len(),
            ..Default::default()
        };

        self.check_live(dataset, &mut report);
        self.check_aqi_history(dataset, &mut report);
        self.check_forecast(dataset, &mut report);
        self.check_state_coverage(dataset, &mut report);

        report
    }

    fn check_live(&self, dataset: &Dataset, report: &mut IntegrityReport) {
        let mut reported_states = BTreeSet::new();

        for (row, obs) in dataset.live().iter().enumerate() {
            if !is_us_state(&obs.state) && reported_states.insert(obs.state.as_str()) {
                report.violations.push(unknown_state(LIVE_TABLE, row, &obs.state));
            }

            if let Err(e) = obs.hour() {
                report.violations.push(DataViolation {
                    table: LIVE_TABLE,
                    row,
                    violation_type: ViolationType::InvalidUtcTime,
                    details: e.to_string(),
                });
            }
        }
    }

    fn check_aqi_history(&self, dataset: &Dataset, report: &mut IntegrityReport) {
        let mut reported_states = BTreeSet::new();

        for (row, sample) in dataset.aqi_history().iter().enumerate() {
            if !is_us_state(&sample.state) && reported_states.insert(sample.state.as_str()) {
                report.violations.push(unknown_state(AQI_TABLE, row, &sample.state));
            }

            if month_abbr(sample.month).is_none() {
                report.violations.push(DataViolation {
                    table: AQI_TABLE,
                    row,
                    violation_type: ViolationType::MonthOutOfRange,
                    details: format!("month {} for {}, {}", sample.month, sample.city, sample.state),
                });
            }

            if !(1..=31).contains(&sample.day) {
                report.violations.push(DataViolation {
                    table: AQI_TABLE,
                    row,
                    violation_type: ViolationType::DayOutOfRange,
                    details: format!("day {} for {}, {}", sample.day, sample.city, sample.state),
                });
            }

            for pollutant in Pollutant::ALL {
                if sample.value(pollutant).is_none() {
                    *report.null_pollutants.entry(pollutant).or_default() += 1;
                }
            }
        }
    }

    fn check_forecast(&self, dataset: &Dataset, report: &mut IntegrityReport) {
        let mut reported_states = BTreeSet::new();
        let mut last_seen = BTreeMap::new();

        for (row, record) in dataset.forecast().iter().enumerate() {
            if !is_us_state(&record.state) && reported_states.insert(record.state.as_str()) {
                report.violations.push(unknown_state(FORECAST_TABLE, row, &record.state));
            }

            if let Some(previous) = last_seen.insert(record.state.as_str(), record.date_time) {
                if record.date_time < previous {
                    report.violations.push(DataViolation {
                        table: FORECAST_TABLE,
                        row,
                        violation_type: ViolationType::ForecastOutOfOrder,
                        details: format!(
                            "{} forecast at {} follows {}",
                            record.state, record.date_time, previous
                        ),
                    });
                }
            }
        }
    }

    fn check_state_coverage(&self, dataset: &Dataset, report: &mut IntegrityReport) {
        let aqi_states: BTreeSet<&str> =
            dataset.aqi_history().iter().map(|s| s.state.as_str()).collect();
        let forecast_states: BTreeSet<&str> =
            dataset.forecast().iter().map(|r| r.state.as_str()).collect();

        for state in dataset.states() {
            if !aqi_states.contains(state.as_str()) {
                report.states_without_aqi.push(state.clone());
            }
            if !forecast_states.contains(state.as_str()) {
                report.states_without_forecast.push(state);
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Dataset Integrity Report ===\n");
        summary.push_str(&format!("Live Observations: {}\n", report.live_rows));
        summary.push_str(&format!("Historical AQI Samples: {}\n", report.aqi_rows));
        summary.push_str(&format!("Forecast Records: {}\n", report.forecast_rows));

        if report.aqi_rows > 0 {
            summary.push_str("\nMissing Pollutant Values (filled with 0):\n");
            for pollutant in Pollutant::ALL {
                let nulls = report.null_pollutants.get(&pollutant).copied().unwrap_or(0);
                summary.push_str(&format!(
                    "  {:>5}: {} ({:.1}%)\n",
                    pollutant.label(),
                    nulls,
                    100.0 * nulls as f64 / report.aqi_rows as f64
                ));
            }
        }

        if !report.states_without_aqi.is_empty() {
            summary.push_str(&format!(
                "\nStates without AQI history: {}\n",
                report.states_without_aqi.join(", ")
            ));
        }
        if !report.states_without_forecast.is_empty() {
            summary.push_str(&format!(
                "States without forecast: {}\n",
                report.states_without_forecast.join(", ")
            ));
        }

        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str(&format!("\nTop {} Violations:\n", self.max_listed_violations));
            for (i, violation) in report
                .violations
                .iter()
                .take(self.max_listed_violations)
                .enumerate()
            {
                summary.push_str(&format!(
                    "  {}. {} row {}: {:?} ({})\n",
                    i + 1,
                    violation.table,
                    violation.row,
                    violation.violation_type,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_state(table: &'static str, row: usize, state: &str) -> DataViolation {
    DataViolation {
        table,
        row,
        violation_type: ViolationType::UnknownState,
        details: format!("'{}' is not a U.S. state name", state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastRecord, HistoricalAqi, LiveObservation};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn live(state: &str, utc_time: &str) -> LiveObservation {
        LiveObservation::new(state, "Somewhere", utc_time, 70.0, 70.0, "clear sky", None, at(1))
    }

    #[test]
    fn test_clean_dataset() {
        let dataset = Dataset::new(
            vec![live("Ohio", "04:00")],
            vec![HistoricalAqi::new("Ohio", "Columbus", 1, 1).with_value(Pollutant::Pm25, Some(1.0))],
            vec![
                ForecastRecord::new("Ohio", at(2), 70.0),
                ForecastRecord::new("Ohio", at(3), 71.0),
            ],
        );

        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&dataset);

        assert!(report.is_clean());
        assert!(report.states_without_aqi.is_empty());
        assert_eq!(report.null_pollutants.get(&Pollutant::Pm25), None);
        assert_eq!(report.null_pollutants.get(&Pollutant::Co), Some(&1));
        assert!(checker.generate_summary(&report).contains("Violations: 0"));
    }

    #[test]
    fn test_detects_violations() {
        let dataset = Dataset::new(
            vec![live("Ohio", "4"), live("Gondor", "04:00"), live("Gondor", "05:00")],
            vec![
                HistoricalAqi::new("Ohio", "Columbus", 0, 1),
                HistoricalAqi::new("Ohio", "Columbus", 1, 32),
            ],
            vec![
                ForecastRecord::new("Ohio", at(3), 70.0),
                ForecastRecord::new("Ohio", at(2), 71.0),
            ],
        );

        let report = IntegrityChecker::new().check_integrity(&dataset);

        assert_eq!(report.count(ViolationType::InvalidUtcTime), 1);
        // Reported once per table, not once per row
        assert_eq!(report.count(ViolationType::UnknownState), 1);
        assert_eq!(report.count(ViolationType::MonthOutOfRange), 1);
        assert_eq!(report.count(ViolationType::DayOutOfRange), 1);
        assert_eq!(report.count(ViolationType::ForecastOutOfOrder), 1);
        assert_eq!(report.states_without_aqi, vec!["Gondor".to_string()]);
        assert_eq!(report.states_without_forecast, vec!["Gondor".to_string()]);
        assert_eq!(report.null_pollutants.get(&Pollutant::Pm25), Some(&2));
    }

    #[test]
    fn test_summary_lists_violations() {
        let dataset = Dataset::new(vec![live("Ohio", "xx")], vec![], vec![]);

        let checker = IntegrityChecker::with_max_listed_violations(5);
        let summary = checker.generate_summary(&checker.check_integrity(&dataset));

        assert!(summary.contains("Violations: 1"));
        assert!(summary.contains("InvalidUtcTime"));
        assert!(summary.contains("States without forecast: Ohio"));
    }
}
