use crate::error::{PipelineError, Result};
use crate::models::{ForecastPoint, ForecastRecord};
use crate::utils::constants::FORECAST_TABLE;

/// Forecast temperature line for a state, in table order.
pub fn forecast_series(forecast: &[ForecastRecord], state: &str) -> Result<Vec<ForecastPoint>> {
    let points: Vec<ForecastPoint> = forecast
        .iter()
        .filter(|r| r.state == state)
        .map(|r| ForecastPoint {
            date_time: r.date_time,
            temperature: r.temperature,
        })
        .collect();

    if points.is_empty() {
        return Err(PipelineError::not_found(FORECAST_TABLE, state));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_forecast_series_keeps_table_order() {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2023, 7, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let forecast = vec![
            ForecastRecord::new("Ohio", day(16), 72.0),
            ForecastRecord::new("Texas", day(16), 95.0),
            ForecastRecord::new("Ohio", day(17), 74.5),
            ForecastRecord::new("Ohio", day(18), 69.0),
        ];

        let series = forecast_series(&forecast, "Ohio").unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date_time, day(16));
        assert_eq!(series[1].temperature, 74.5);
        assert_eq!(series[2].date_time, day(18));
    }

    #[test]
    fn test_forecast_series_unknown_state() {
        let err = forecast_series(&[], "Ohio").unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { table: "forecast", .. }));
    }
}
