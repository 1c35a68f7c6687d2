use std::sync::LazyLock;

use regex::Regex;

static HOURS_MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*h(?:ours?)?\s*(\d+)?\s*m?(?:in(?:utes?)?)?\s*$").unwrap()
});
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\d+)\s*m(?:in(?:utes?)?)?\s*$").unwrap());
static BARE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*$").unwrap());

/// Normalizes a source's free-form runtime string (`"120"`, `"120 min"`,
/// `"1h58"`, `"1h 58m"`, `"2h"`) to whole minutes. Returns `None` for
/// anything unrecognized rather than guessing.
pub fn normalize_runtime_minutes(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Some(caps) = HOURS_MINUTES_RE.captures(trimmed) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        return Some(hours * 60 + minutes);
    }
    if let Some(caps) = MINUTES_RE.captures(trimmed) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = BARE_NUMBER_RE.captures(trimmed) {
        return caps[1].parse().ok();
    }
    None
}
