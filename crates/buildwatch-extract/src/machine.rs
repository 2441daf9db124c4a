//! The line-classification state machine.

use buildwatch_types::Diagnostic;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::lines::to_lines;

/// Opens a diagnostic: `path:line:column: message`, where the path
/// contains no colon and the column is optional. Anchored on the whole
/// line.
static DIAGNOSTIC_BEGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:]+?):(\d+)(?::(\d+))?: (.+)$").expect("begin pattern is valid")
});

/// Closes a diagnostic: the compiler's `N error generated.` sentinel
/// line. The sentinel itself is discarded.
static DIAGNOSTIC_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+ errors? generated\.$").expect("end pattern is valid"));

/// Extracts structured diagnostics from raw console output.
///
/// Runs [`to_lines`] and then classifies each line in a single forward
/// pass, tracking at most one "ongoing" diagnostic:
///
/// 1. a line matching the begin pattern opens a new diagnostic, closing
///    any ongoing one (a new start always supersedes);
/// 2. a line matching the end sentinel closes the ongoing diagnostic;
/// 3. any other line while a diagnostic is ongoing is appended verbatim
///    to its context;
/// 4. any other line is ignored.
///
/// Diagnostics come back in the order their begin lines appeared.
pub fn extract(raw: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut ongoing = false;

    for line in to_lines(raw) {
        if let Some(captures) = DIAGNOSTIC_BEGIN.captures(&line) {
            let line_number = captures[2].parse().unwrap_or(0);
            let column = captures.get(3).and_then(|m| m.as_str().parse().ok());
            diagnostics.push(Diagnostic {
                path_in_workspace: captures[1].to_owned(),
                line: line_number,
                column,
                message: captures[4].to_owned(),
                context: Vec::new(),
            });
            ongoing = true;
            continue;
        }
        if DIAGNOSTIC_END.is_match(&line) {
            ongoing = false;
            continue;
        }
        if ongoing {
            if let Some(diagnostic) = diagnostics.last_mut() {
                diagnostic.context.push(line);
            }
        }
    }

    diagnostics
}
