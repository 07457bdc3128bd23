use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes derived series as JSON, to a file or any writer.
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize `value` into `out`, followed by a newline
    pub fn write_to<T, W>(&self, value: &T, mut out: W) -> Result<()>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, value)?;
        } else {
            serde_json::to_writer(&mut out, value)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    /// Write `value` to `path`, creating parent directories as needed
    pub fn write_file<T>(&self, value: &T, path: &Path) -> Result<JsonFileInfo>
    where
        T: Serialize + ?Sized,
    {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        self.write_to(value, BufWriter::new(file))?;

        let info = self.get_file_info(path)?;
        debug!(path = %path.display(), bytes = info.file_size, "Wrote JSON output");
        Ok(info)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<JsonFileInfo> {
        let metadata = std::fs::metadata(path)?;
        Ok(JsonFileInfo {
            path: path.display().to_string(),
            file_size: metadata.len(),
            pretty: self.pretty,
        })
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileInfo {
    pub path: String,
    pub file_size: u64,
    pub pretty: bool,
}

impl JsonFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "JSON File Summary:\n\
            - Path: {}\n\
            - File size: {:.2} KB\n\
            - Pretty printed: {}",
            self.path,
            self.file_size as f64 / 1024.0,
            self.pretty
        )
    }
}
