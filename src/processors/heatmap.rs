use crate::error::{PipelineError, Result};
use crate::models::{HeatmapGrid, HeatmapRow, HistoricalAqi, Pollutant};
use crate::utils::calendar::month_abbr;
use crate::utils::constants::AQI_TABLE;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Month-by-day grid of one pollutant for a state.
///
/// Samples are grouped by (city, month, day) and averaged over their non-null
/// values; a group with only nulls counts as 0.0. Cities reporting the same
/// day are averaged into one cell. Days with no samples stay absent.
pub fn month_day_heatmap(
    aqi_history: &[HistoricalAqi],
    state: &str,
    pollutant: Pollutant,
) -> Result<HeatmapGrid> {
    let mut groups: BTreeMap<(&str, u32, u32), MeanAccumulator> = BTreeMap::new();

    for sample in aqi_history.iter().filter(|s| s.state == state) {
        let group = groups
            .entry((sample.city.as_str(), sample.month, sample.day))
            .or_default();
        if let Some(value) = sample.value(pollutant) {
            group.add(value);
        }
    }

    if groups.is_empty() {
        return Err(PipelineError::not_found(AQI_TABLE, state));
    }

    let mut cells: BTreeMap<(u32, u32), MeanAccumulator> = BTreeMap::new();
    for ((_, month, day), group) in groups {
        cells
            .entry((month, day))
            .or_default()
            .add(group.mean().unwrap_or(0.0));
    }

    let mut rows: Vec<HeatmapRow> = Vec::new();
    for ((month, day), cell) in cells {
        let value = cell.mean().unwrap_or(0.0);

        match rows.last_mut() {
            Some(row) if row.month == month => {
                row.cells.insert(day, value);
            }
            _ => {
                let label = month_abbr(month).ok_or_else(|| {
                    PipelineError::InvalidFormat(format!(
                        "Month {} out of range in {} data for {}",
                        month, AQI_TABLE, state
                    ))
                })?;
                rows.push(HeatmapRow {
                    month,
                    label,
                    cells: BTreeMap::from([(day, value)]),
                });
            }
        }
    }

    Ok(HeatmapGrid::new(pollutant, rows))
}

/// Same as [`month_day_heatmap`], taking the pollutant code as text.
pub fn month_day_heatmap_by_code(
    aqi_history: &[HistoricalAqi],
    state: &str,
    pollutant: &str,
) -> Result<HeatmapGrid> {
    month_day_heatmap(aqi_history, state, pollutant.parse()?)
}
