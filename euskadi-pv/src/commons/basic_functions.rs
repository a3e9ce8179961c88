use crate::pipeline::config::ThousandsSeparator;

/// Normalize a municipality code read from the statistics CSV
/// Codes are nominally 5 digits; a 4-character code lost its leading zero
/// upstream and gets exactly one `'0'` back. Any other length is returned as-is
/// (a 3-character code stays unmatched).
pub fn normalize_municipality_code(raw: &str) -> String {
    if raw.chars().count() == 4 {
        format!("0{}", raw)
    } else {
        raw.to_string()
    }
}

/// Normalize a region code read from the boundary file (trim only)
pub fn normalize_region_code(raw: &str) -> String {
    raw.trim().to_string()
}

/// Parse a locale-formatted decimal ("1.234,5", "48,0")
/// Thousands separators are stripped before the decimal comma becomes a point.
/// Returns None for anything that is not a finite non-negative number.
pub fn parse_locale_decimal(text: &str, thousands: ThousandsSeparator) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let without_thousands = match thousands.as_char() {
        Some(sep) => text.replace(sep, ""),
        None => text.to_string(),
    };
    let normalized = without_thousands.replace(',', ".");

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}
