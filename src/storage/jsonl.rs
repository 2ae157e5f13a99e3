//! JSONL (JSON Lines) storage for benchmark records.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::schema::{BenchRecord, SCHEMA_VERSION};
use crate::{BenchError, BenchResult};

/// JSONL writer/reader for benchmark records.
///
/// Each record is stored as a single JSON line, so successive harness runs can
/// append to the same file.
#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    /// The file is created on first append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonlWriter {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append every record, opening the file once.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Any record's schema_version doesn't match SCHEMA_VERSION (nothing is written)
    /// - File operations fail
    /// - JSON serialization fails
    pub fn append_all(&self, records: &[BenchRecord]) -> BenchResult<()> {
        for record in records {
            if record.schema_version != SCHEMA_VERSION {
                return Err(BenchError::Message(format!(
                    "schema version mismatch: record has v{}, expected v{}",
                    record.schema_version, SCHEMA_VERSION
                )));
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::io("failed to create directory", parent, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BenchError::io("failed to open file", &self.path, e))?;

        for record in records {
            let json = serde_json::to_string(record)
                .map_err(|e| BenchError::Message(format!("failed to serialize record: {e}")))?;
            writeln!(file, "{json}")
                .map_err(|e| BenchError::io("failed to write record", &self.path, e))?;
        }

        Ok(())
    }

    /// Read all records.
    ///
    /// # Errors
    /// Returns an error if the file is missing or any non-blank line fails to parse.
    pub fn read_all(&self) -> BenchResult<Vec<BenchRecord>> {
        let file =
            File::open(&self.path).map_err(|e| BenchError::io("failed to open file", &self.path, e))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result
                .map_err(|e| BenchError::io("failed to read line", &self.path, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: BenchRecord = serde_json::from_str(&line).map_err(|e| {
                BenchError::Message(format!("failed to parse line {}: {e}", line_num + 1))
            })?;
            records.push(record);
        }

        Ok(records)
    }
}
