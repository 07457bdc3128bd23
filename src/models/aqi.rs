use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::PipelineError;

/// Pollutants tracked by the historical air-quality dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    O3,
    Pm10,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::O3,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Column code used by the dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::O3 => "o3",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Human-facing tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm2.5",
            other => other.code(),
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Pollutant {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pollutant::ALL
            .into_iter()
            .find(|p| p.code() == s)
            .ok_or_else(|| {
                PipelineError::InvalidArgument(format!(
                    "unknown pollutant '{}', expected one of pm25, o3, pm10, no2, so2, co",
                    s
                ))
            })
    }
}

/// One daily pollutant sample for a city.
///
/// Header names in the source file carry a leading space (`" pm25"`); the
/// reader trims headers so the plain field names match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct HistoricalAqi {
    #[validate(length(min = 1))]
    pub state: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 1, max = 31))]
    pub day: u32,

    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub o3: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub so2: Option<f64>,
    #[serde(default)]
    pub co: Option<f64>,
}

impl HistoricalAqi {
    pub fn new(state: &str, city: &str, month: u32, day: u32) -> Self {
        Self {
            state: state.to_string(),
            city: city.to_string(),
            month,
            day,
            pm25: None,
            o3: None,
            pm10: None,
            no2: None,
            so2: None,
            co: None,
        }
    }

    pub fn with_value(mut self, pollutant: Pollutant, value: Option<f64>) -> Self {
        *self.slot_mut(pollutant) = value;
        self
    }

    /// Concentration for `pollutant`; NaN cells count as missing.
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        let value = match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::O3 => self.o3,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        };
        value.filter(|v| !v.is_nan())
    }

    fn slot_mut(&mut self, pollutant: Pollutant) -> &mut Option<f64> {
        match pollutant {
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::O3 => &mut self.o3,
            Pollutant::Pm10 => &mut self.pm10,
            Pollutant::No2 => &mut self.no2,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Co => &mut self.co,
        }
    }
}
