//! Escaping utilities for Graphviz output.
//!
//! Resource names and tags come from the cloud provider and may contain
//! quotes, backslashes or newlines that would terminate a DOT string early.
//! Every value embedded in a quoted DOT string goes through
//! [`escape_dot`] first.

/// Escape a string for inclusion inside a double-quoted DOT string.
///
/// - `"` -> `\"`
/// - `\` -> `\\`
/// - newline -> `\n` (a DOT line break)
/// - other control characters are dropped
///
/// # Examples
///
/// ```
/// use netdrift::reports::escape::escape_dot;
///
/// assert_eq!(escape_dot(r#"web "prod""#), r#"web \"prod\""#);
/// assert_eq!(escape_dot("plain"), "plain");
/// ```
pub fn escape_dot(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            c if c.is_control() => {}
            _ => result.push(c),
        }
    }
    result
}
