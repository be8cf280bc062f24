use rust_decimal::Decimal;

/// Insert thousands separators into the integer part of a formatted number.
/// `"1234567.89"` → `"1,234,567.89"`
fn group_thousands(formatted: &str) -> String {
    let mut parts = formatted.splitn(2, '.');
    let int_part = parts.next().unwrap_or("0");
    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");
    match parts.next() {
        Some(dec_part) => format!("{with_commas}.{dec_part}"),
        None => with_commas,
    }
}

/// Format an amount with thousands separators, 2 decimal places and the
/// currency symbol. e.g. `-1234.5` → `"-Bs1,234.50"`
pub fn format_amount(val: Decimal, symbol: &str) -> String {
    let grouped = group_thousands(&format!("{:.2}", val.abs()));
    if val < Decimal::ZERO {
        format!("-{symbol}{grouped}")
    } else {
        format!("{symbol}{grouped}")
    }
}

/// Format a break-even unit count. An unreachable break-even is shown as `∞`.
pub fn format_units(units: f64) -> String {
    if units.is_infinite() {
        return if units > 0.0 { "∞".into() } else { "-∞".into() };
    }
    if units.is_nan() {
        return "n/a".into();
    }
    let grouped = group_thousands(&format!("{:.2}", units.abs()));
    if units < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a fraction as a whole percentage. `0.256` → `"26%"`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
