use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{PipelineError, Result};

/// One hourly reading for a city, as exported by the live weather feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LiveObservation {
    #[validate(length(min = 1))]
    pub state: String,

    #[validate(length(min = 1))]
    pub city: String,

    /// Observation time as exported, "HH:MM..." in UTC.
    #[serde(rename = "UTC_time")]
    pub utc_time: String,

    #[serde(rename = "Temperature")]
    pub temperature: f64,

    pub feels_like: f64,

    #[serde(default)]
    pub weather_description: String,

    #[serde(rename = "pm2.5", default)]
    pub pm2_5: Option<f64>,

    #[serde(with = "super::datetime_format")]
    pub graph_date: NaiveDateTime,

    /// Two-letter postal code, used for choropleth locations.
    #[serde(rename = "STATE", default)]
    pub state_code: Option<String>,
}

impl LiveObservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: &str,
        city: &str,
        utc_time: &str,
        temperature: f64,
        feels_like: f64,
        weather_description: &str,
        pm2_5: Option<f64>,
        graph_date: NaiveDateTime,
    ) -> Self {
        Self {
            state: state.to_string(),
            city: city.to_string(),
            utc_time: utc_time.to_string(),
            temperature,
            feels_like,
            weather_description: weather_description.to_string(),
            pm2_5,
            graph_date,
            state_code: None,
        }
    }

    pub fn with_state_code(mut self, code: &str) -> Self {
        self.state_code = Some(code.to_string());
        self
    }

    /// Hour of the observation, taken from the first two characters of `UTC_time`.
    pub fn hour(&self) -> Result<u32> {
        let raw = self.utc_time.trim();
        raw.get(..2)
            .and_then(|prefix| prefix.parse::<u32>().ok())
            .ok_or_else(|| {
                PipelineError::InvalidFormat(format!(
                    "Invalid UTC_time '{}' for {}, {}",
                    self.utc_time, self.city, self.state
                ))
            })
    }

    pub fn is_in_state(&self, state: &str) -> bool {
        self.state == state
    }
}
