use crate::error::{PipelineError, Result};
use crate::models::{CurrentConditions, HourlyPoint, LiveObservation, StateTemperature};
use crate::utils::constants::LIVE_TABLE;
use crate::utils::us_states::state_code;
use std::collections::BTreeMap;
use tracing::warn;

/// Latest reading per city: the row with the greatest hour, first row on ties.
///
/// Keyed by city name so iteration order is alphabetical.
fn latest_per_city<'a, I>(rows: I) -> Result<BTreeMap<&'a str, (u32, &'a LiveObservation)>>
where
    I: IntoIterator<Item = &'a LiveObservation>,
{
    let mut latest: BTreeMap<&str, (u32, &LiveObservation)> = BTreeMap::new();

    for row in rows {
        let hour = row.hour()?;
        latest
            .entry(row.city.as_str())
            .and_modify(|current| {
                if hour > current.0 {
                    *current = (hour, row);
                }
            })
            .or_insert((hour, row));
    }

    Ok(latest)
}

/// Current conditions for a state's indicator widgets.
///
/// Each city contributes its latest hour; the city that sorts first by name
/// is reported.
pub fn latest_reading(live: &[LiveObservation], state: &str) -> Result<CurrentConditions> {
    let latest = latest_per_city(live.iter().filter(|r| r.is_in_state(state)))?;

    let (hour, row) = latest
        .into_values()
        .next()
        .ok_or_else(|| PipelineError::not_found(LIVE_TABLE, state))?;

    Ok(CurrentConditions {
        city: row.city.clone(),
        hour,
        temperature: row.temperature,
        feels_like: row.feels_like,
        weather_description: row.weather_description.clone(),
    })
}

/// Hourly pm2.5 bars and temperature line for a state, ordered by `graph_date`.
pub fn hourly_series(live: &[LiveObservation], state: &str) -> Result<Vec<HourlyPoint>> {
    let mut points: Vec<HourlyPoint> = live
        .iter()
        .filter(|r| r.is_in_state(state))
        .map(|r| HourlyPoint {
            timestamp: r.graph_date,
            pm2_5: r.pm2_5,
            temperature: r.temperature,
        })
        .collect();

    if points.is_empty() {
        return Err(PipelineError::not_found(LIVE_TABLE, state));
    }

    // Stable, so rows sharing a timestamp keep table order
    points.sort_by_key(|p| p.timestamp);

    Ok(points)
}

/// Current temperature of every state in the live table, for the choropleth.
///
/// A state whose rows carry an unreadable `UTC_time` is left off the map.
pub fn state_temperatures(live: &[LiveObservation]) -> Vec<StateTemperature> {
    let mut by_state: BTreeMap<&str, Vec<&LiveObservation>> = BTreeMap::new();
    for row in live {
        by_state.entry(row.state.as_str()).or_default().push(row);
    }

    let mut temperatures = Vec::with_capacity(by_state.len());
    for (state, rows) in by_state {
        let latest = match latest_per_city(rows) {
            Ok(latest) => latest,
            Err(e) => {
                warn!(state, "Skipping state on choropleth: {}", e);
                continue;
            }
        };
        if let Some((_, row)) = latest.into_values().next() {
            let code = row
                .state_code
                .clone()
                .or_else(|| state_code(state).map(str::to_string));

            temperatures.push(StateTemperature {
                state: state.to_string(),
                code,
                temperature: row.temperature,
            });
        }
    }

    temperatures
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn obs(state: &str, city: &str, hour: u32, temperature: f64, description: &str) -> LiveObservation {
        LiveObservation::new(
            state,
            city,
            &format!("{:02}:00", hour),
            temperature,
            temperature - 1.0,
            description,
            Some(hour as f64),
            at(15, hour),
        )
    }

    #[test]
    fn test_latest_reading_picks_max_hour() {
        let live = vec![
            obs("Rhode Island", "Providence", 1, 60.0, "mist"),
            obs("Rhode Island", "Providence", 23, 66.0, "clear sky"),
            obs("Rhode Island", "Providence", 5, 62.0, "light rain"),
        ];

        let current = latest_reading(&live, "Rhode Island").unwrap();

        assert_eq!(
            current,
            CurrentConditions {
                city: "Providence".to_string(),
                hour: 23,
                temperature: 66.0,
                feels_like: 65.0,
                weather_description: "clear sky".to_string(),
            }
        );
    }

    #[test]
    fn test_latest_reading_tie_breaks_by_city_name() {
        let live = vec![
            obs("Texas", "Houston", 9, 90.0, "haze"),
            obs("Texas", "Austin", 3, 80.0, "clear sky"),
            obs("Texas", "Austin", 8, 85.0, "few clouds"),
            obs("Ohio", "Akron", 12, 70.0, "overcast clouds"),
        ];

        let current = latest_reading(&live, "Texas").unwrap();
        assert_eq!(current.city, "Austin");
        assert_eq!(current.hour, 8);
        assert_eq!(current.temperature, 85.0);
    }

    #[test]
    fn test_latest_reading_first_row_wins_on_equal_hour() {
        let live = vec![
            obs("Ohio", "Columbus", 7, 70.0, "first"),
            obs("Ohio", "Columbus", 7, 71.0, "second"),
        ];

        let current = latest_reading(&live, "Ohio").unwrap();
        assert_eq!(current.weather_description, "first");
    }

    #[test]
    fn test_latest_reading_unknown_state() {
        let live = vec![obs("Ohio", "Columbus", 7, 70.0, "clear sky")];

        let err = latest_reading(&live, "Atlantis").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_latest_reading_bad_utc_time() {
        let mut row = obs("Ohio", "Columbus", 7, 70.0, "clear sky");
        row.utc_time = "x".to_string();

        assert!(matches!(
            latest_reading(&[row], "Ohio"),
            Err(PipelineError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_hourly_series_orders_by_graph_date() {
        let mut late = obs("Ohio", "Columbus", 2, 71.0, "clear sky");
        late.graph_date = at(16, 2);
        let live = vec![
            late,
            obs("Ohio", "Columbus", 9, 75.0, "clear sky"),
            obs("Texas", "Austin", 1, 88.0, "clear sky"),
            obs("Ohio", "Dayton", 3, 72.0, "clear sky"),
        ];

        let series = hourly_series(&live, "Ohio").unwrap();

        assert_eq!(series.len(), 3);
        let temps: Vec<f64> = series.iter().map(|p| p.temperature).collect();
        assert_eq!(temps, vec![72.0, 75.0, 71.0]);
        assert_eq!(series[0].pm2_5, Some(3.0));
    }

    #[test]
    fn test_hourly_series_stable_for_equal_timestamps() {
        let live = vec![
            obs("Ohio", "Columbus", 4, 70.0, "clear sky"),
            obs("Ohio", "Dayton", 4, 68.0, "clear sky"),
        ];

        let series = hourly_series(&live, "Ohio").unwrap();
        assert_eq!(series[0].temperature, 70.0);
        assert_eq!(series[1].temperature, 68.0);
    }

    #[test]
    fn test_hourly_series_unknown_state() {
        assert!(hourly_series(&[], "Ohio").unwrap_err().is_not_found());
    }

    #[test]
    fn test_state_temperatures() {
        let live = vec![
            obs("Texas", "Austin", 3, 80.0, "clear sky"),
            obs("Texas", "Austin", 8, 85.0, "clear sky"),
            obs("Ohio", "Columbus", 7, 70.0, "clear sky").with_state_code("OH"),
            obs("Atlantis", "Poseidonia", 7, 50.0, "clear sky"),
        ];

        let temperatures = state_temperatures(&live);

        assert_eq!(
            temperatures,
            vec![
                StateTemperature {
                    state: "Atlantis".to_string(),
                    code: None,
                    temperature: 50.0,
                },
                StateTemperature {
                    state: "Ohio".to_string(),
                    code: Some("OH".to_string()),
                    temperature: 70.0,
                },
                StateTemperature {
                    state: "Texas".to_string(),
                    code: Some("TX".to_string()),
                    temperature: 85.0,
                },
            ]
        );
    }

    #[test]
    fn test_state_temperatures_skips_unreadable_state() {
        let mut broken = obs("Ohio", "Columbus", 7, 70.0, "clear sky");
        broken.utc_time = "??".to_string();
        let live = vec![broken, obs("Texas", "Austin", 8, 85.0, "clear sky")];

        let temperatures = state_temperatures(&live);

        assert_eq!(temperatures.len(), 1);
        assert_eq!(temperatures[0].state, "Texas");
        assert_eq!(temperatures[0].temperature, 85.0);
    }
}
