//! Shared data model for the buildwatch collector.
//!
//! Everything that crosses a crate boundary lives here: the [`Report`]
//! assembled from one build stream, the [`Diagnostic`] records the
//! extractor produces, lexical path normalization for store keys, and
//! the serde mirror types used by the debug recorder.

mod path;
mod recording;
mod report;

pub use path::normalize_path;
pub use recording::{RecordedEvent, RecordedPayload};
pub use report::{Diagnostic, Report};
