//! Diagnostic extraction from raw build console output.
//!
//! Build tools hand the collector the merged stdout/stderr of each build
//! step as one opaque blob, complete with terminal escape sequences and
//! mixed line endings. This crate turns such a blob into:
//!
//! * a cleaned sequence of logical lines ([`to_lines`]), reusable by any
//!   tooling that wants readable console output, and
//! * a structured sequence of [`Diagnostic`]s ([`extract`]), produced by
//!   a single forward pass over those lines.
//!
//! Both functions are pure; nothing here touches I/O or shared state.
//!
//! [`Diagnostic`]: buildwatch_types::Diagnostic

mod lines;
mod machine;

pub use lines::to_lines;
pub use machine::extract;
