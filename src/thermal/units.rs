//! Length and area normalization to SI units.
//!
//! Model attributes carry dimensions as bare numbers in model units, as
//! unit-suffixed text (`"70mm"`) or as free text. Everything is
//! brought to meters / square meters here, and anything that does not look
//! like a number is rejected as `None` instead of raising.

use crate::config::ThermalConfig;
use crate::model::AttributeValue;

const ALLOWED_CHARS: &str = "0123456789.me+- ";

/// Converts a length attribute to meters.
///
/// Text containing `mm` is read as millimeters. Plain numbers strictly above
/// [`ThermalConfig::length_mm_threshold`] are assumed to be millimeters,
/// everything else meters. Any other text, including a bare `m` suffix, is
/// rejected.
#[must_use]
pub fn normalize_length(raw: &AttributeValue, config: &ThermalConfig) -> Option<f64> {
    match raw {
        AttributeValue::Number(n) if n.is_finite() => Some(apply_mm_threshold(*n, config)),
        AttributeValue::Text(s) => {
            let s = clean_token(s)?;
            if s.contains("mm") {
                return first_decimal(&s).map(|v| v / 1000.0);
            }
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| apply_mm_threshold(v, config))
        }
        _ => None,
    }
}

/// Converts an area attribute to square meters.
///
/// Areas get no magnitude heuristic: `mm2` text is scaled, any other number
/// is taken as square meters.
#[must_use]
pub fn normalize_area(raw: &AttributeValue) -> Option<f64> {
    match raw {
        AttributeValue::Number(n) if n.is_finite() => Some(*n),
        AttributeValue::Text(s) => {
            let s = clean_token(s)?;
            if s.contains("mm") {
                return first_decimal(&s).map(|v| v / 1_000_000.0);
            }
            if let Some(square_meters) = s.strip_suffix("m2").or_else(|| s.strip_suffix('m')) {
                return square_meters.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            }
            s.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        AttributeValue::Boolean(_) | AttributeValue::Number(_) => None,
    }
}

/// Reads a plain number (volume, U-value) without any unit heuristic.
#[must_use]
pub fn parse_number(raw: &AttributeValue) -> Option<f64> {
    match raw {
        AttributeValue::Text(s) => clean_token(s)?.parse::<f64>().ok().filter(|v| v.is_finite()),
        other => other.as_f64(),
    }
}

/// Picks a thickness out of a name suffix such as `"Timber 70mm"`.
///
/// The last number in the name is read with the unit that directly follows
/// it. A `m` suffix is taken as meters as written; `mm` and bare numbers go
/// through [`normalize_length`].
#[must_use]
pub fn length_from_name(name: &str, config: &ThermalConfig) -> Option<f64> {
    let lower = name.to_lowercase();
    let mut rest = lower.as_str();
    let mut last = None;

    while let Some(start) = rest.find(|c: char| c.is_ascii_digit()) {
        let tail = &rest[start..];
        let len = tail
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(tail.len());
        let number = tail[..len].trim_end_matches('.');
        let after = tail[len..].trim_start();

        let unit = if after.starts_with("mm") {
            "mm"
        } else if after.starts_with('m') && !after[1..].starts_with(char::is_alphabetic) {
            "m"
        } else {
            ""
        };

        last = Some((number, unit));
        rest = &tail[len..];
    }

    match last? {
        (number, "m") => number.parse::<f64>().ok().filter(|v| v.is_finite()),
        (number, unit) => {
            normalize_length(&AttributeValue::Text(format!("{number}{unit}")), config)
        }
    }
}

fn apply_mm_threshold(value: f64, config: &ThermalConfig) -> f64 {
    if value > config.length_mm_threshold {
        value / 1000.0
    } else {
        value
    }
}

/// Lowercases and trims; `None` if any character falls outside the numeric alphabet.
fn clean_token(s: &str) -> Option<String> {
    let s = s.trim().to_lowercase();
    if s.is_empty() || !s.chars().all(|c| ALLOWED_CHARS.contains(c)) {
        return None;
    }
    Some(s)
}

/// First `digits[.digits]` run in the string.
fn first_decimal(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let tail = &s[start..];
    let int_len = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    let mut end = int_len;

    let frac = &tail[int_len..];
    if let Some(digits) = frac.strip_prefix('.') {
        let frac_len = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }

    tail[..end].parse().ok()
}
