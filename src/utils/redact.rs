use regex::Regex;
use std::sync::LazyLock;

static SENSITIVE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\b[a-z]:[\\/][^\s;'\x22]+", "[PATH]"),
        (r"(?i)password[=:][^\s;'\x22]+", "password=[REDACTED]"),
        (r"(?i)pwd[=:][^\s;'\x22]+", "pwd=[REDACTED]"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("redaction patterns are valid"),
            replacement,
        )
    })
    .collect()
});

/// Strips local paths and credentials from driver error text before it is
/// written to an error file or a log line.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = message.to_string();
    for (pattern, replacement) in SENSITIVE_PATTERNS.iter() {
        sanitized = pattern.replace_all(&sanitized, *replacement).into_owned();
    }
    sanitized
}
