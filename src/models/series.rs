//! Shaped results handed to the display layer.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::Pollutant;

/// Values shown by the indicator widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub city: String,
    pub hour: u32,
    pub temperature: f64,
    pub feels_like: f64,
    pub weather_description: String,
}

/// One bar/line point of the hourly pollution and temperature chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    #[serde(with = "super::datetime_format")]
    pub timestamp: NaiveDateTime,
    pub pm2_5: Option<f64>,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    #[serde(with = "super::datetime_format")]
    pub date_time: NaiveDateTime,
    pub temperature: f64,
}

/// Current temperature of one state, located by postal code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTemperature {
    pub state: String,
    pub code: Option<String>,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub month: u32,
    pub label: &'static str,
    /// Day of month -> pollutant value. Days without data are absent.
    pub cells: BTreeMap<u32, f64>,
}

/// Month-by-day pollutant grid; rows ascend by month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGrid {
    pub pollutant: Pollutant,
    pub rows: Vec<HeatmapRow>,
}

impl HeatmapGrid {
    pub fn new(pollutant: Pollutant, rows: Vec<HeatmapRow>) -> Self {
        Self { pollutant, rows }
    }

    pub fn row(&self, label: &str) -> Option<&HeatmapRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Cell lookup by month abbreviation and day.
    pub fn get(&self, label: &str, day: u32) -> Option<f64> {
        self.row(label).and_then(|r| r.cells.get(&day).copied())
    }

    pub fn month_labels(&self) -> Vec<&'static str> {
        self.rows.iter().map(|r| r.label).collect()
    }

    /// Populated cells as (month label, day, value), sorted by month then day.
    pub fn cells(&self) -> impl Iterator<Item = (&'static str, u32, f64)> + '_ {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().map(move |(day, value)| (r.label, *day, *value)))
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every series derived for one state selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub state: String,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub heatmaps: BTreeMap<Pollutant, HeatmapGrid>,
}
