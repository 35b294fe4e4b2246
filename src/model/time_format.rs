//! Conversion of the query editor's Java-style date/time patterns to
//! [`chrono` strftime] patterns.
//!
//! The frontend stores time formats using Java `SimpleDateFormat` tokens
//! (`yyyy-MM-dd HH:mm:ss`); the backend transport wants a pattern it can
//! hand to `chrono`. Only the tokens the editor documents are mapped;
//! any other text passes through unchanged.
//!
//! [`chrono` strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html

/// Supported Java-style tokens and their strftime equivalents.
const TOKENS: &[(&str, &str)] = &[
    ("yyyy", "%Y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
];

/// Convert a Java-style date/time pattern to a `chrono` strftime pattern.
///
/// Each token is replaced at most once, left to right, so replacement
/// output is never rescanned (`mm` in the input cannot match the `%m`
/// produced for an earlier `MM`). Literal `%` characters are escaped to
/// `%%` so they survive strftime formatting; everything else is copied
/// verbatim.
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;
    'scan: while let Some(c) = rest.chars().next() {
        for (token, subst) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(subst);
                rest = tail;
                continue 'scan;
            }
        }
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}
