use crate::error::{PipelineError, Result};
use crate::models::{ForecastRecord, HistoricalAqi, LiveObservation};
use crate::utils::constants::{AQI_TABLE, DEFAULT_BUFFER_SIZE, FORECAST_TABLE, LIVE_TABLE};
use memmap2::Mmap;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

/// What to do with a row that deserializes but fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidRows {
    /// Drop the row with a warning
    #[default]
    Skip,
    /// Keep the row so an integrity check can report it
    Keep,
    /// Fail the read with `InvalidFormat`
    Reject,
}

/// Reads the three source tables from CSV.
///
/// Headers and fields are trimmed, so `" pm25"` style headers match plain
/// field names.
#[derive(Debug, Clone, Copy)]
pub struct TableReader {
    use_mmap: bool,
    invalid_rows: InvalidRows,
}

impl TableReader {
    pub fn new() -> Self {
        Self {
            use_mmap: false,
            invalid_rows: InvalidRows::Skip,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_invalid_rows(mut self, invalid_rows: InvalidRows) -> Self {
        self.invalid_rows = invalid_rows;
        self
    }

    pub fn read_live(&self, path: &Path) -> Result<Vec<LiveObservation>> {
        self.read_table(path, LIVE_TABLE)
    }

    pub fn read_aqi_history(&self, path: &Path) -> Result<Vec<HistoricalAqi>> {
        self.read_table(path, AQI_TABLE)
    }

    pub fn read_forecast(&self, path: &Path) -> Result<Vec<ForecastRecord>> {
        self.read_table(path, FORECAST_TABLE)
    }

    /// Read any table whose rows deserialize into `T`
    pub fn read_table<T>(&self, path: &Path, table: &'static str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Validate,
    {
        debug!(table, path = %path.display(), mmap = self.use_mmap, "Reading table");

        let file = File::open(path)?;
        let records = if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_from(&mmap[..], table)?
        } else {
            self.read_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file), table)?
        };

        debug!(table, rows = records.len(), "Finished reading table");
        Ok(records)
    }

    /// Deserialize rows from any CSV source
    pub fn read_from<T, R>(&self, source: R, table: &'static str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Validate,
        R: Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (index, row) in reader.deserialize::<T>().enumerate() {
            let record = row?;

            if let Err(e) = record.validate() {
                // +2: header line and 1-based numbering
                let line = index + 2;
                match self.invalid_rows {
                    InvalidRows::Reject => {
                        return Err(PipelineError::InvalidFormat(format!(
                            "{} row at line {} failed validation: {}",
                            table, line, e
                        )));
                    }
                    InvalidRows::Keep => {
                        debug!(table, line, error = %e, "Keeping invalid row");
                    }
                    InvalidRows::Skip => {
                        warn!(table, line, error = %e, "Skipping invalid row");
                        skipped += 1;
                        continue;
                    }
                }
            }

            records.push(record);
        }

        if skipped > 0 {
            warn!(table, skipped, kept = records.len(), "Dropped rows that failed validation");
        }

        Ok(records)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}
