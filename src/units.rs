//! Unit conversion utilities for raw GSD field codes.
//!
//! GSD devices store coordinates as degree-decimal-minute digit strings,
//! times as `HHMMSS` integers (leading zero dropped before 10:00) and speed
//! in hundredths. These helpers turn single raw values into their
//! human-readable form. Every function returns `None` on malformed input
//! instead of an error.

/// Number of decimal places for WGS84 coordinates
pub const WGS84_PRECISION: usize = 7;

/// Number of decimal places for rescaled speed values
pub const SPEED_PRECISION: usize = 2;

/// Raw speed codes are stored in hundredths of the physical unit
pub const SPEED_DIVISOR: f64 = 100.0;

/// Divisor applied to the minutes part of coordinates longer than 4 digits
const MINUTES_DIVISOR: f64 = 10_000.0;

fn is_ascii_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Convert a DDM digit string to decimal degrees.
///
/// The first two digits are whole degrees. The remaining digits are
/// minutes: taken as-is for a 4-digit value, or divided by 10000 for
/// anything longer.
pub fn ddm_to_decimal_degrees(raw: &str) -> Option<f64> {
    if !is_ascii_digits(raw) || raw.len() < 4 {
        return None;
    }

    let degrees: f64 = raw[..2].parse().ok()?;
    let minutes: f64 = raw[2..].parse().ok()?;
    let minutes = if raw.len() > 4 {
        minutes / MINUTES_DIVISOR
    } else {
        minutes
    };

    Some(degrees + minutes / 60.0)
}

/// Convert a DDM digit string to a fixed-point WGS84 string, or `""`
pub fn format_wgs84(raw: &str) -> String {
    ddm_to_decimal_degrees(raw)
        .map(|deg| format!("{:.*}", WGS84_PRECISION, deg))
        .unwrap_or_default()
}

/// Format a raw `HHMMSS`/`HMMSS` time code as `HH:MM:SS`.
pub fn format_time_code(raw: &str) -> Option<String> {
    if !is_ascii_digits(raw) || !(5..=6).contains(&raw.len()) {
        return None;
    }

    let padded = format!("{:0>6}", raw);
    Some(format!(
        "{}:{}:{}",
        &padded[0..2],
        &padded[2..4],
        &padded[4..6]
    ))
}

/// Parse a decimal number, also accepting `_` separators between digits
/// (`1_000`) and the `inf`/`infinity`/`nan` spellings in any case.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if !raw.contains('_') {
        return raw.parse().ok();
    }

    let bytes = raw.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    raw.replace('_', "").parse().ok()
}

/// Rescale a raw speed code to the physical unit with two decimals.
///
/// Returns `None` when the value does not parse. Infinite and NaN codes
/// come out as `inf`, `-inf` and `nan`.
pub fn rescale_speed(raw: &str) -> Option<String> {
    let value = parse_decimal(raw)? / SPEED_DIVISOR;
    if value.is_nan() {
        return Some("nan".to_string());
    }
    Some(format!("{:.*}", SPEED_PRECISION, value))
}
