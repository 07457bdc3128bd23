use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ForecastRecord {
    #[validate(length(min = 1))]
    pub state: String,

    #[serde(with = "super::datetime_format")]
    pub date_time: NaiveDateTime,

    #[serde(rename = "Temperature")]
    pub temperature: f64,
}

impl ForecastRecord {
    pub fn new(state: &str, date_time: NaiveDateTime, temperature: f64) -> Self {
        Self {
            state: state.to_string(),
            date_time,
            temperature,
        }
    }
}
