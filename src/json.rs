//! JSON text helpers shared by adapters.

use serde_json::Value;

const FRAGMENT_RADIUS: usize = 20;

/// Encode `value`, two-space indented when `indent` is set.
pub fn json_dumps(value: &Value, indent: bool) -> String {
    if indent {
        format!("{value:#}")
    } else {
        value.to_string()
    }
}

/// Show where `doc` failed to parse.
///
/// Returns up to twenty characters either side of the failure on its line,
/// followed by a caret under the failing column and the parser's message:
///
/// ```text
/// {"name": tru}
///              ^ expected ident
/// ```
pub fn json_decode_error_fragment(doc: &str, err: &serde_json::Error) -> String {
    let message = err.to_string();
    let message = message
        .split_once(" at line ")
        .map(|(head, _)| head.to_string())
        .unwrap_or(message);

    let line: Vec<char> = doc
        .lines()
        .nth(err.line().saturating_sub(1))
        .unwrap_or_default()
        .chars()
        .collect();
    let pos = err.column().saturating_sub(1).min(line.len());
    let start = pos.saturating_sub(FRAGMENT_RADIUS);
    let end = (pos + FRAGMENT_RADIUS).min(line.len());

    let fragment: String = line[start..end].iter().collect();
    format!("{fragment}\n{}^ {message}", " ".repeat(pos - start))
}
