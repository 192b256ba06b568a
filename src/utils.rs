//! Utility helpers shared across the WASM frontend.

use chrono::{DateTime, Utc};

/// US-dollar price with thousands separators, e.g. `$1,299.00`.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let digits = dollars.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Card timestamp, e.g. `Mar 7, 2024, 03:05 PM`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Chat timestamp, e.g. `15:05`.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// Capitalise the first letter of a &str.
pub fn capitalise_first(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}
