pub mod aqi;
pub mod dataset;
pub mod datetime_format;
pub mod forecast;
pub mod live;
pub mod series;

pub use aqi::{HistoricalAqi, Pollutant};
pub use dataset::Dataset;
pub use forecast::ForecastRecord;
pub use live::LiveObservation;
pub use series::{
    CurrentConditions, DashboardSnapshot, ForecastPoint, HeatmapGrid, HeatmapRow, HourlyPoint,
    StateTemperature,
};
