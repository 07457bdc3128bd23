use chrono::{Datelike, Local};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_OUTPUT_DIR;

/// Default snapshot filename with format: dashboard-{state-slug}-{YYMMDD}.json
pub fn generate_default_snapshot_filename(state: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "dashboard-{}-{:02}{:02}{:02}.json",
        state_slug(state),
        year,
        month,
        day
    );
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(filename)
}

/// Lowercase, hyphen-separated form of a state name ("Rhode Island" -> "rhode-island").
pub fn state_slug(state: &str) -> String {
    state
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
