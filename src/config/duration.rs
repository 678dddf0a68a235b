//! Duration parsing utilities.

use anyhow::Context;

/// Parse a duration string into seconds. Accepts a plain number of seconds
/// ("300"), or a number with an `s`, `m`, or `h` suffix ("300s", "30m",
/// "1h").
pub fn parse_duration_to_secs(s: &str) -> anyhow::Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("empty duration string");
    }

    let (number, multiplier) = match s.chars().last() {
        Some('h') => (&s[..s.len() - 1], 3600),
        Some('m') => (&s[..s.len() - 1], 60),
        Some('s') => (&s[..s.len() - 1], 1),
        _ => (s, 1),
    };

    let value: i64 = number
        .parse()
        .with_context(|| format!("invalid duration value: {s}"))?;
    Ok(value * multiplier)
}
