//! ANSI stripping and line splitting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches one CSI escape sequence, not just color codes:
///
/// * `\x1b` — the ESC character (ASCII 27)
/// * `\[` — the literal `[` that follows ESC in CSI sequences
/// * `[0-9;?]*` — zero or more parameter bytes (digits, semicolons,
///   question marks)
/// * `[ -/]*` — zero or more intermediate bytes
/// * `[@-~]` — exactly one final byte (usually a letter like `m` or `K`)
static ANSI_CODES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ANSI pattern is valid"));

/// Splits raw console output into cleaned logical lines.
///
/// Strips every CSI escape sequence, then splits on any carriage-return
/// or line-feed boundary, discarding empty segments. Idempotent on input
/// that is already free of escape sequences.
pub fn to_lines(raw: &str) -> Vec<String> {
    let stripped = ANSI_CODES.replace_all(raw, "");
    stripped
        .split(['\r', '\n'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}
