//! Display helpers for market figures
//!
//! The API returns most numbers as strings; these helpers accept either form.

use serde_json::Value;

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Formats a price as US dollars with thousands separators, e.g. `$1,234.50`
pub fn format_currency(value: &Value) -> String {
    match as_number(value) {
        Some(n) if !is_blank(value) => {
            let sign = if n < 0.0 { "-" } else { "" };
            let cents = format!("{:.2}", n.abs());
            let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
            format!("{}${}.{}", sign, group_thousands(whole), frac)
        }
        _ => "$0.00".to_string(),
    }
}

/// Formats a percentage; strings already carrying `%` pass through unchanged
pub fn format_percentage(value: &Value) -> String {
    if is_blank(value) {
        return "0.00%".to_string();
    }
    if let Value::String(s) = value {
        if s.contains('%') {
            return s.clone();
        }
    }
    match as_number(value) {
        Some(n) => format!("{:.2}%", n),
        None => "0.00%".to_string(),
    }
}

/// Abbreviates a share volume, e.g. `75.0M`
pub fn format_volume(value: &Value) -> String {
    let Some(n) = as_number(value).filter(|_| !is_blank(value)) else {
        return "0".to_string();
    };
    let n = n.trunc();
    if n >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{}", n as i64)
    }
}

/// Abbreviates a market capitalization, e.g. `$2.50T`
pub fn format_market_cap(value: &Value) -> String {
    let Some(n) = as_number(value).filter(|_| !is_blank(value)) else {
        return "N/A".to_string();
    };
    let n = n.trunc();
    if n >= 1_000_000_000_000.0 {
        format!("${:.2}T", n / 1_000_000_000_000.0)
    } else if n >= 1_000_000_000.0 {
        format!("${:.2}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("${:.2}M", n / 1_000_000.0)
    } else {
        format!("${}", group_thousands(&(n as i64).to_string()))
    }
}

/// Whether a change value is non-negative
pub fn is_positive_change(value: &Value) -> bool {
    if is_blank(value) {
        return false;
    }
    match value {
        Value::String(s) => !s.trim().starts_with('-'),
        other => as_number(other).is_some_and(|n| n >= 0.0),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", sign, grouped)
}
