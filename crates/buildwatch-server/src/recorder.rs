//! Debug recording of ingestion streams.
//!
//! Fixture-generation tooling: when a recorder is attached, the stream
//! handler mirrors every decoded event into a buffer, and on normal
//! stream completion the buffer is written out as pretty-printed JSON,
//! named after the stream's single configured target. Recording is an
//! injected strategy, never ambient state; with no recorder attached,
//! ingestion behaves identically and none of this code runs.

use std::path::{Path, PathBuf};

use buildwatch_types::RecordedEvent;
use thiserror::Error;

/// Errors that can occur when writing a stream recording.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// A recording needs exactly one configured target to name its file.
    #[error("recording only works for 1 target, got {0}")]
    WrongLabelCount(usize),

    /// The configured target is outside the recordable package.
    #[error("recording only works for targets in `{prefix}`, got `{label}`")]
    ForeignLabel { prefix: String, label: String },

    /// The recording could not be serialized.
    #[error("failed to serialize recording: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The recording file could not be written.
    #[error("failed to write recording: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes completed stream recordings into a fixture directory.
#[derive(Debug)]
pub struct Recorder {
    dir: PathBuf,
    label_prefix: String,
}

impl Recorder {
    /// Creates a recorder writing into `dir`, accepting only streams
    /// whose single configured target label starts with `label_prefix`.
    pub fn new(dir: impl Into<PathBuf>, label_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            label_prefix: label_prefix.into(),
        }
    }

    /// Writes one stream's recording, returning the file written.
    ///
    /// The file is named after the single configured label with the
    /// package prefix stripped: label `//fixtures:non_fatal_error` with
    /// prefix `//fixtures:` becomes `<dir>/non_fatal_error.json`.
    ///
    /// # Errors
    ///
    /// Fails when the stream configured zero or several targets, when
    /// the label is outside the configured prefix, or on I/O trouble.
    pub fn write(
        &self,
        labels: &[String],
        events: &[RecordedEvent],
    ) -> Result<PathBuf, RecorderError> {
        let [label] = labels else {
            return Err(RecorderError::WrongLabelCount(labels.len()));
        };
        let Some(name) = label.strip_prefix(&self.label_prefix) else {
            return Err(RecorderError::ForeignLabel {
                prefix: self.label_prefix.clone(),
                label: label.clone(),
            });
        };

        let path = self.dir.join(name).with_extension("json");
        let contents = serde_json::to_string_pretty(events)?;
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// The directory recordings are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
