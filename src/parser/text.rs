use regex::Captures;

/// Replace non-breaking spaces, which break most of the line patterns.
pub fn sanitize(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
}

/// Trimmed capture group, `None` when absent or blank.
pub fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
