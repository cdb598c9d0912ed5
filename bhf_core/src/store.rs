//! Append-only sample store.
//!
//! Samples are appended to a JSONL (JSON Lines) file with file locking to
//! ensure safe concurrent access. Reads return samples sorted by timestamp
//! with duplicate timestamps collapsed, so the output is ready for the
//! aggregator.

use crate::types::HeartRateSample;
use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// JSONL-backed sample store with file locking
pub struct SampleStore {
    path: PathBuf,
}

impl SampleStore {
    /// Create a store handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a batch of samples as JSON lines
    pub fn append(&self, samples: &[HeartRateSample]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        for sample in samples {
            let line = serde_json::to_string(sample)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended {} samples to {:?}", samples.len(), self.path);
        Ok(())
    }

    /// Read all samples whose timestamps fall inside `[start, end]`.
    ///
    /// Malformed lines are logged and skipped rather than failing the read.
    pub fn read_window(&self, start_ms: i64, end_ms: i64) -> Result<Vec<HeartRateSample>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let reader = BufReader::new(&file);
        let mut samples = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<HeartRateSample>(&line) {
                Ok(sample) => {
                    if sample.timestamp_ms >= start_ms && sample.timestamp_ms <= end_ms {
                        samples.push(sample);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse sample at line {}: {}", line_num + 1, e);
                    // Continue reading, don't fail completely
                }
            }
        }

        file.unlock()?;

        samples.sort_by_key(|s| s.timestamp_ms);
        samples.dedup_by_key(|s| s.timestamp_ms);

        tracing::debug!(
            "Read {} samples from {:?} for window {}..{}",
            samples.len(),
            self.path,
            start_ms,
            end_ms
        );
        Ok(samples)
    }
}
